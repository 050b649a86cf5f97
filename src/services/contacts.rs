//! Business rules for contact CRUD and search.

use std::sync::Arc;

use crate::domain::contact::Contact;
use crate::domain::filter::{ContactFilter, ContactPredicate};
use crate::domain::types::ContactId;
use crate::dto::contacts::ContactsQuery;
use crate::forms::contacts::{ContactForm, ContactPayload};
use crate::pagination::{PageRequest, Paginated};
use crate::repository::errors::RepositoryError;
use crate::repository::{ContactListQuery, ContactRepository};
use crate::services::{ServiceError, ServiceResult};

/// Stateless façade over a contact store.
///
/// Holds only the store handle and the page size, so one instance can serve
/// any number of concurrent requests.
#[derive(Clone)]
pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
    page_size: usize,
}

/// Ids that cannot exist are reported as missing records.
fn existing_id(id: i32) -> ServiceResult<ContactId> {
    ContactId::new(id).map_err(|_| ServiceError::NotFound)
}

fn log_internal(action: &str) -> impl Fn(ServiceError) -> ServiceError + '_ {
    move |err| {
        if let ServiceError::Internal(message) = &err {
            log::error!("Failed to {action}: {message}");
        }
        err
    }
}

impl ContactService {
    pub fn new<R>(repo: R, page_size: usize) -> Self
    where
        R: ContactRepository + 'static,
    {
        Self {
            repo: Arc::new(repo),
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn page_request(&self, page: usize) -> ServiceResult<PageRequest> {
        Ok(PageRequest::new(page, self.page_size)?)
    }

    fn find_page(
        &self,
        predicate: ContactPredicate,
        page: usize,
    ) -> ServiceResult<Paginated<Contact>> {
        let request = self.page_request(page)?;
        let (total, items) = self
            .repo
            .list_contacts(ContactListQuery::new().predicate(predicate).paginate(request))
            .map_err(ServiceError::from)
            .map_err(log_internal("list contacts"))?;

        Ok(Paginated::new(items, request, total))
    }

    /// Returns one page of all contacts, ordered by id.
    pub fn list_all(&self, page: usize) -> ServiceResult<Paginated<Contact>> {
        self.find_page(ContactPredicate::match_all(), page)
    }

    /// Returns one page of contacts whose name contains `name`, ignoring case.
    pub fn list_by_name(&self, name: &str, page: usize) -> ServiceResult<Paginated<Contact>> {
        let filter = ContactFilter::default().name(name);
        self.find_page(ContactPredicate::build(&filter), page)
    }

    /// Returns one page of contacts matching any of the filter's set fields.
    pub fn search(&self, filter: &ContactFilter, page: usize) -> ServiceResult<Paginated<Contact>> {
        self.find_page(ContactPredicate::build(filter), page)
    }

    /// Dispatches a listing request: unfiltered when no filter field is set.
    pub fn list(&self, query: ContactsQuery) -> ServiceResult<Paginated<Contact>> {
        let page = query.page.unwrap_or(1);
        let filter = query.filter();

        if filter.is_empty() {
            self.list_all(page)
        } else if filter.phone.is_none() {
            let name = filter.name.as_deref().unwrap_or_default();
            self.list_by_name(name, page)
        } else {
            self.search(&filter, page)
        }
    }

    pub fn get_by_id(&self, id: i32) -> ServiceResult<Contact> {
        let id = existing_id(id)?;
        self.repo
            .get_contact_by_id(id)
            .map_err(ServiceError::from)
            .map_err(log_internal("get contact"))
    }

    /// Validates and stores a new contact, returning the stored record.
    pub fn create(&self, form: ContactForm) -> ServiceResult<Contact> {
        let requested_id = form.id;
        let new_contact = ContactPayload::try_from(form)?.into_new_contact();

        if let Some(id) = requested_id.and_then(|id| ContactId::new(id).ok()) {
            match self.repo.get_contact_by_id(id) {
                Ok(_) => return Err(ServiceError::AlreadyExists),
                Err(RepositoryError::NotFound) => {}
                Err(err) => return Err(log_internal("check contact id")(err.into())),
            }
        }

        if self
            .repo
            .contact_exists(&new_contact)
            .map_err(ServiceError::from)
            .map_err(log_internal("check contact uniqueness"))?
        {
            return Err(ServiceError::AlreadyExists);
        }

        self.repo
            .create_contact(&new_contact)
            .map_err(ServiceError::from)
            .map_err(log_internal("create contact"))
    }

    /// Replaces the contact stored under `id`.
    ///
    /// Existence is checked before the payload, so an unknown id is reported
    /// as missing whatever the body holds.
    pub fn update(&self, id: i32, form: ContactForm) -> ServiceResult<Contact> {
        let id = existing_id(id)?;
        self.repo
            .get_contact_by_id(id)
            .map_err(ServiceError::from)
            .map_err(log_internal("load contact for update"))?;

        let updates = ContactPayload::try_from(form)?.into_update();

        self.repo
            .update_contact(id, &updates)
            .map_err(ServiceError::from)
            .map_err(log_internal("update contact"))
    }

    pub fn delete_by_id(&self, id: i32) -> ServiceResult<()> {
        let id = existing_id(id)?;
        self.repo
            .delete_contact(id)
            .map_err(ServiceError::from)
            .map_err(log_internal("delete contact"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    fn service() -> ContactService {
        ContactService::new(InMemoryRepository::new(), 5)
    }

    fn form(name: &str, phone: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            phone: Some(phone.to_string()),
            ..ContactForm::default()
        }
    }

    fn names(page: &Paginated<Contact>) -> Vec<&str> {
        page.items.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn create_then_get_round_trips_caller_fields() {
        let service = service();
        let submitted = ContactForm {
            email: Some("ann@example.com".to_string()),
            address: Some("1 Main St".to_string()),
            fields: [("company".to_string(), "Acme".to_string())].into(),
            ..form("Ann", "555-1")
        };

        let created = service.create(submitted).unwrap();
        let fetched = service.get_by_id(created.id.get()).unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name.as_str(), "Ann");
        assert_eq!(fetched.phone.as_ref().map(|p| p.as_str()), Some("555-1"));
        assert_eq!(fetched.email.as_ref().map(|e| e.as_str()), Some("ann@example.com"));
        assert_eq!(fetched.address.as_deref(), Some("1 Main St"));
        assert_eq!(fetched.fields.get("company").map(String::as_str), Some("Acme"));
    }

    #[test]
    fn create_returns_store_assigned_id() {
        let service = service();
        let first = service.create(form("Ann", "555-1")).unwrap();
        let second = service.create(form("Bob", "555-2")).unwrap();
        assert_eq!(first.id.get(), 1);
        assert_eq!(second.id.get(), 2);
    }

    #[test]
    fn duplicate_create_is_already_exists() {
        let service = service();
        service.create(form("Ann", "555-1")).unwrap();
        assert!(matches!(
            service.create(form("Ann", "555-1")),
            Err(ServiceError::AlreadyExists)
        ));
    }

    #[test]
    fn create_with_taken_id_is_already_exists() {
        let service = service();
        let existing = service.create(form("Ann", "555-1")).unwrap();
        let clash = ContactForm {
            id: Some(existing.id.get()),
            ..form("Someone Else", "555-9")
        };
        assert!(matches!(service.create(clash), Err(ServiceError::AlreadyExists)));
    }

    #[test]
    fn malformed_create_is_bad_resource() {
        let service = service();
        assert!(matches!(
            service.create(form("", "555-1")),
            Err(ServiceError::BadResource(_))
        ));
        assert!(matches!(
            service.create(form("Ann", "five five five")),
            Err(ServiceError::BadResource(_))
        ));
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let service = service();
        assert!(matches!(service.get_by_id(99), Err(ServiceError::NotFound)));
        assert!(matches!(service.get_by_id(0), Err(ServiceError::NotFound)));
    }

    #[test]
    fn update_unknown_id_is_not_found_even_with_bad_payload() {
        let service = service();
        assert!(matches!(
            service.update(7, form("Ann", "555-1")),
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.update(7, ContactForm::default()),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn update_replaces_contact() {
        let service = service();
        let created = service.create(form("Ann", "555-1")).unwrap();

        let updated = service
            .update(created.id.get(), form("Annie", "555-7"))
            .unwrap();
        assert_eq!(updated.id, created.id);

        let fetched = service.get_by_id(created.id.get()).unwrap();
        assert_eq!(fetched.name.as_str(), "Annie");
        assert_eq!(fetched.phone.as_ref().map(|p| p.as_str()), Some("555-7"));
    }

    #[test]
    fn update_with_bad_payload_is_bad_resource() {
        let service = service();
        let created = service.create(form("Ann", "555-1")).unwrap();
        assert!(matches!(
            service.update(created.id.get(), form(" ", "555-1")),
            Err(ServiceError::BadResource(_))
        ));
    }

    #[test]
    fn update_into_existing_slot_is_already_exists() {
        let service = service();
        service.create(form("Ann", "555-1")).unwrap();
        let bob = service.create(form("Bob", "555-2")).unwrap();
        assert!(matches!(
            service.update(bob.id.get(), form("Ann", "555-1")),
            Err(ServiceError::AlreadyExists)
        ));
    }

    #[test]
    fn second_delete_is_not_found() {
        let service = service();
        let created = service.create(form("Ann", "555-1")).unwrap();
        service.delete_by_id(created.id.get()).unwrap();
        assert!(matches!(
            service.delete_by_id(created.id.get()),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn list_all_pages_with_configured_size() {
        let service = service();
        for n in 1..=12 {
            service.create(form(&format!("Contact {n:02}"), "555")).unwrap();
        }

        let first = service.list_all(1).unwrap();
        assert_eq!(first.items.len(), 5);
        assert_eq!(first.total, 12);
        assert_eq!(first.total_pages, 3);
        assert_eq!(names(&first)[0], "Contact 01");

        let third = service.list_all(3).unwrap();
        assert_eq!(names(&third), vec!["Contact 11", "Contact 12"]);

        assert!(service.list_all(4).unwrap().items.is_empty());
    }

    #[test]
    fn page_size_comes_from_construction() {
        let service = ContactService::new(InMemoryRepository::new(), 2);
        for name in ["A", "B", "C"] {
            service.create(form(name, "1")).unwrap();
        }
        assert_eq!(service.list_all(1).unwrap().items.len(), 2);
        assert_eq!(service.list_all(2).unwrap().items.len(), 1);
    }

    #[test]
    fn page_zero_is_bad_resource() {
        assert!(matches!(service().list_all(0), Err(ServiceError::BadResource(_))));
    }

    #[test]
    fn list_by_name_is_case_insensitive() {
        let service = service();
        service.create(form("Ann", "555-1")).unwrap();
        service.create(form("Bob", "555-2")).unwrap();
        service.create(form("Joanna", "555-3")).unwrap();

        let page = service.list_by_name("ANN", 1).unwrap();
        assert_eq!(names(&page), vec!["Ann", "Joanna"]);
    }

    #[test]
    fn list_dispatches_on_filter_fields() {
        let service = service();
        service.create(form("Ann", "555-1")).unwrap();
        service.create(form("Bob", "777-2")).unwrap();
        service.create(form("Cid", "888-3")).unwrap();

        let all = service.list(ContactsQuery::default()).unwrap();
        assert_eq!(all.total, 3);

        let by_name = service
            .list(ContactsQuery {
                name: Some("bo".to_string()),
                ..ContactsQuery::default()
            })
            .unwrap();
        assert_eq!(names(&by_name), vec!["Bob"]);

        let either = service
            .list(ContactsQuery {
                name: Some("ann".to_string()),
                phone: Some("888".to_string()),
                page: Some(1),
            })
            .unwrap();
        assert_eq!(names(&either), vec!["Ann", "Cid"]);
    }
}
