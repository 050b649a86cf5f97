//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::contact::{Contact, NewContact, UpdateContact};
use crate::domain::types::ContactId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ContactListQuery, ContactReader, ContactWriter};

mock! {
    pub Repository {}

    impl ContactReader for Repository {
        fn list_contacts(&self, query: ContactListQuery) -> RepositoryResult<(usize, Vec<Contact>)>;
        fn get_contact_by_id(&self, id: ContactId) -> RepositoryResult<Contact>;
        fn contact_exists(&self, contact: &NewContact) -> RepositoryResult<bool>;
    }

    impl ContactWriter for Repository {
        fn create_contact(&self, new_contact: &NewContact) -> RepositoryResult<Contact>;
        fn update_contact(&self, id: ContactId, updates: &UpdateContact) -> RepositoryResult<Contact>;
        fn delete_contact(&self, id: ContactId) -> RepositoryResult<()>;
    }
}
