//! Contact CRUD endpoints.

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::dto::contacts::ContactsQuery;
use crate::forms::contacts::ContactForm;
use crate::routes::{TOTAL_COUNT_HEADER, TOTAL_PAGES_HEADER};
use crate::services::contacts::ContactService;
use crate::services::{ServiceError, ServiceResult};

/// Logs rejected requests; internal failures are logged by the service.
fn log_rejection(action: &str, err: &ServiceError) {
    if !matches!(err, ServiceError::Internal(_)) {
        log::warn!("Failed to {action}: {err}");
    }
}

#[get("/contacts")]
pub async fn list_contacts(
    query: web::Query<ContactsQuery>,
    service: web::Data<ContactService>,
) -> ServiceResult<HttpResponse> {
    let page = service
        .list(query.into_inner())
        .inspect_err(|err| log_rejection("list contacts", err))?;

    Ok(HttpResponse::Ok()
        .insert_header((TOTAL_COUNT_HEADER, page.total.to_string()))
        .insert_header((TOTAL_PAGES_HEADER, page.total_pages.to_string()))
        .json(page.items))
}

#[get("/contacts/{contact_id}")]
pub async fn show_contact(
    contact_id: web::Path<i32>,
    service: web::Data<ContactService>,
) -> ServiceResult<HttpResponse> {
    let contact = service
        .get_by_id(contact_id.into_inner())
        .inspect_err(|err| log_rejection("get contact", err))?;

    Ok(HttpResponse::Ok().json(contact))
}

#[post("/contacts")]
pub async fn create_contact(
    web::Json(form): web::Json<ContactForm>,
    service: web::Data<ContactService>,
) -> ServiceResult<HttpResponse> {
    let contact = service
        .create(form)
        .inspect_err(|err| log_rejection("create contact", err))?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/contacts/{}", contact.id)))
        .json(contact))
}

#[put("/contacts/{contact_id}")]
pub async fn update_contact(
    contact_id: web::Path<i32>,
    web::Json(form): web::Json<ContactForm>,
    service: web::Data<ContactService>,
) -> ServiceResult<HttpResponse> {
    service
        .update(contact_id.into_inner(), form)
        .inspect_err(|err| log_rejection("update contact", err))?;

    Ok(HttpResponse::Ok().finish())
}

#[delete("/contacts/{contact_id}")]
pub async fn delete_contact(
    contact_id: web::Path<i32>,
    service: web::Data<ContactService>,
) -> ServiceResult<HttpResponse> {
    service
        .delete_by_id(contact_id.into_inner())
        .inspect_err(|err| log_rejection("delete contact", err))?;

    Ok(HttpResponse::Ok().finish())
}
