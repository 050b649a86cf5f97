//! Process-local contact store.
//!
//! Keeps contacts in a `BTreeMap` keyed by id behind a `RwLock`, applying the
//! same ordering, pagination and uniqueness rules as the SQLite store. Useful
//! for tests and for running the API without a database file.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use chrono::Utc;

use crate::domain::contact::{Contact, NewContact, UpdateContact};
use crate::domain::types::ContactId;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ContactListQuery, ContactReader, ContactWriter};

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i32,
    contacts: BTreeMap<ContactId, Contact>,
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> RepositoryError {
    RepositoryError::Unexpected("contact store lock poisoned".to_string())
}

impl ContactReader for InMemoryRepository {
    fn list_contacts(&self, query: ContactListQuery) -> RepositoryResult<(usize, Vec<Contact>)> {
        let state = self.state.read().map_err(poisoned)?;

        let matching = state
            .contacts
            .values()
            .filter(|contact| query.predicate.matches(contact));
        let total = matching.clone().count();

        let items = match query.pagination {
            Some(page) => matching
                .skip(page.offset())
                .take(page.per_page())
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };

        Ok((total, items))
    }

    fn get_contact_by_id(&self, id: ContactId) -> RepositoryResult<Contact> {
        let state = self.state.read().map_err(poisoned)?;
        state
            .contacts
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn contact_exists(&self, contact: &NewContact) -> RepositoryResult<bool> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.contacts.values().any(|c| contact.collides_with(c)))
    }
}

impl ContactWriter for InMemoryRepository {
    fn create_contact(&self, new_contact: &NewContact) -> RepositoryResult<Contact> {
        let mut state = self.state.write().map_err(poisoned)?;

        if state.contacts.values().any(|c| new_contact.collides_with(c)) {
            return Err(RepositoryError::Duplicate(format!(
                "contact {} already exists",
                new_contact.name
            )));
        }

        let next_id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::Unexpected("contact ids exhausted".to_string()))?;
        let id = ContactId::new(next_id)?;
        let now = Utc::now().naive_utc();
        let contact = Contact {
            id,
            name: new_contact.name.clone(),
            phone: new_contact.phone.clone(),
            email: new_contact.email.clone(),
            address: new_contact.address.clone(),
            fields: new_contact.fields.clone(),
            created_at: now,
            updated_at: now,
        };

        state.last_id = next_id;
        state.contacts.insert(id, contact.clone());
        Ok(contact)
    }

    fn update_contact(&self, id: ContactId, updates: &UpdateContact) -> RepositoryResult<Contact> {
        let mut state = self.state.write().map_err(poisoned)?;

        if !state.contacts.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if state
            .contacts
            .values()
            .any(|c| c.id != id && updates.collides_with(c))
        {
            return Err(RepositoryError::Duplicate(format!(
                "contact {} already exists",
                updates.name
            )));
        }

        let contact = state
            .contacts
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        contact.name = updates.name.clone();
        contact.phone = updates.phone.clone();
        contact.email = updates.email.clone();
        contact.address = updates.address.clone();
        contact.fields = updates.fields.clone();
        contact.updated_at = Utc::now().naive_utc();

        Ok(contact.clone())
    }

    fn delete_contact(&self, id: ContactId) -> RepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state
            .contacts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::filter::{ContactFilter, ContactPredicate};
    use crate::domain::types::{ContactName, PhoneNumber};
    use crate::pagination::PageRequest;

    fn new_contact(name: &str, phone: Option<&str>) -> NewContact {
        NewContact::new(
            ContactName::new(name).unwrap(),
            phone.map(|p| PhoneNumber::new(p).unwrap()),
            None,
            None,
            BTreeMap::new(),
        )
    }

    fn seeded(count: usize) -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        for n in 1..=count {
            repo.create_contact(&new_contact(&format!("Contact {n}"), None))
                .unwrap();
        }
        repo
    }

    fn page_ids(repo: &InMemoryRepository, page: usize) -> Vec<i32> {
        let query = ContactListQuery::new().paginate(PageRequest::new(page, 5).unwrap());
        let (_, items) = repo.list_contacts(query).unwrap();
        items.iter().map(|c| c.id.get()).collect()
    }

    #[test]
    fn pages_slice_ordered_results() {
        let repo = seeded(12);
        assert_eq!(page_ids(&repo, 1), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_ids(&repo, 3), vec![11, 12]);
        assert!(page_ids(&repo, 4).is_empty());
    }

    #[test]
    fn total_counts_all_matches() {
        let repo = seeded(12);
        let query = ContactListQuery::new().paginate(PageRequest::new(4, 5).unwrap());
        let (total, items) = repo.list_contacts(query).unwrap();
        assert_eq!(total, 12);
        assert!(items.is_empty());
    }

    #[test]
    fn predicate_limits_listing() {
        let repo = InMemoryRepository::new();
        repo.create_contact(&new_contact("Alice", Some("111"))).unwrap();
        repo.create_contact(&new_contact("Bob", Some("222"))).unwrap();

        let predicate = ContactPredicate::build(&ContactFilter::default().name("ALI"));
        let (total, items) = repo
            .list_contacts(ContactListQuery::new().predicate(predicate))
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].name.as_str(), "Alice");
    }

    #[test]
    fn duplicate_name_and_phone_is_rejected() {
        let repo = InMemoryRepository::new();
        repo.create_contact(&new_contact("Ann", Some("555-1"))).unwrap();
        assert!(repo.contact_exists(&new_contact("Ann", Some("555-1"))).unwrap());
        assert!(matches!(
            repo.create_contact(&new_contact("Ann", Some("555-1"))),
            Err(RepositoryError::Duplicate(_))
        ));
        assert!(repo.create_contact(&new_contact("Ann", None)).is_ok());
    }

    #[test]
    fn update_and_delete_require_existing_ids() {
        let repo = InMemoryRepository::new();
        let missing = ContactId::new(42).unwrap();
        let updates = UpdateContact::new(
            ContactName::new("Nobody").unwrap(),
            None,
            None,
            None,
            BTreeMap::new(),
        );
        assert!(matches!(
            repo.update_contact(missing, &updates),
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            repo.delete_contact(missing),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let repo = InMemoryRepository::new();
        let first = repo.create_contact(&new_contact("A", None)).unwrap();
        repo.delete_contact(first.id).unwrap();
        let second = repo.create_contact(&new_contact("B", None)).unwrap();
        assert_eq!(second.id.get(), first.id.get() + 1);
    }
}
