//! Persistence boundary for contacts.
//!
//! Stores implement [`ContactReader`] and [`ContactWriter`]; the service layer
//! only ever sees them through the [`ContactRepository`] trait object.

use crate::db::DbPool;
use crate::domain::contact::{Contact, NewContact, UpdateContact};
use crate::domain::filter::ContactPredicate;
use crate::domain::types::ContactId;
use crate::pagination::PageRequest;
use crate::repository::errors::RepositoryResult;

pub mod contact;
pub mod errors;
pub mod memory;
#[cfg(feature = "test-mocks")]
pub mod mock;

pub use memory::InMemoryRepository;

#[derive(Debug, Clone)]
pub struct ContactListQuery {
    pub predicate: ContactPredicate,
    pub pagination: Option<PageRequest>,
}

impl ContactListQuery {
    /// Unfiltered, unpaginated listing.
    pub fn new() -> Self {
        Self {
            predicate: ContactPredicate::match_all(),
            pagination: None,
        }
    }

    pub fn predicate(mut self, predicate: ContactPredicate) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn paginate(mut self, request: PageRequest) -> Self {
        self.pagination = Some(request);
        self
    }
}

impl Default for ContactListQuery {
    fn default() -> Self {
        Self::new()
    }
}

pub trait ContactReader {
    /// Returns the number of matching contacts and the requested page of them,
    /// ordered by id. A page past the end yields an empty vector.
    fn list_contacts(&self, query: ContactListQuery) -> RepositoryResult<(usize, Vec<Contact>)>;
    /// Fails with [`errors::RepositoryError::NotFound`] when no contact has `id`.
    fn get_contact_by_id(&self, id: ContactId) -> RepositoryResult<Contact>;
    /// Whether a contact with the same name and phone is already stored.
    fn contact_exists(&self, contact: &NewContact) -> RepositoryResult<bool>;
}

pub trait ContactWriter {
    fn create_contact(&self, new_contact: &NewContact) -> RepositoryResult<Contact>;
    fn update_contact(&self, id: ContactId, updates: &UpdateContact) -> RepositoryResult<Contact>;
    fn delete_contact(&self, id: ContactId) -> RepositoryResult<()>;
}

/// Everything the contact service needs from a store.
pub trait ContactRepository: ContactReader + ContactWriter + Send + Sync {}

impl<T> ContactRepository for T where T: ContactReader + ContactWriter + Send + Sync {}

/// Diesel-backed store sharing a SQLite connection pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}
