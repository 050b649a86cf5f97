//! HTTP surface of the contacts API.

use actix_web::{HttpResponse, Scope, error, web};

pub mod contacts;

/// Header carrying the number of contacts matching a listing request.
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";
/// Header carrying the number of pages in a listing at the configured page size.
pub const TOTAL_PAGES_HEADER: &str = "X-Total-Pages";

/// Rejects unparsable JSON bodies with a bare 400.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        log::warn!("Rejected JSON body for {}: {err}", req.path());
        error::InternalError::from_response(err, HttpResponse::BadRequest().finish()).into()
    })
}

/// Rejects unparsable query strings with a bare 400.
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| {
        log::warn!("Rejected query string for {}: {err}", req.path());
        error::InternalError::from_response(err, HttpResponse::BadRequest().finish()).into()
    })
}

/// Builds the `/api` scope with every contact endpoint registered.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(json_config())
        .app_data(query_config())
        .service(contacts::list_contacts)
        .service(contacts::show_contact)
        .service(contacts::create_contact)
        .service(contacts::update_contact)
        .service(contacts::delete_contact)
}
