//! DTOs exposed by the contacts API endpoints.

use serde::Deserialize;

use crate::domain::filter::ContactFilter;

/// Query parameters accepted by the contact listing service.
#[derive(Debug, Default, Deserialize)]
pub struct ContactsQuery {
    /// Optional case-insensitive substring matched against contact names.
    pub name: Option<String>,
    /// Optional case-insensitive substring matched against phone numbers.
    pub phone: Option<String>,
    /// Optional 1-indexed page number; the first page when absent.
    pub page: Option<usize>,
}

impl ContactsQuery {
    pub fn filter(&self) -> ContactFilter {
        ContactFilter {
            name: self.name.clone(),
            phone: self.phone.clone(),
        }
    }
}
