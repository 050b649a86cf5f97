use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ContactEmail, ContactId, ContactName, PhoneNumber};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub name: ContactName,
    pub phone: Option<PhoneNumber>,
    pub email: Option<ContactEmail>,
    pub address: Option<String>,
    /// Additional profile attributes, opaque to the service.
    pub fields: BTreeMap<String, String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewContact {
    pub name: ContactName,
    pub phone: Option<PhoneNumber>,
    pub email: Option<ContactEmail>,
    pub address: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl NewContact {
    #[must_use]
    pub fn new(
        name: ContactName,
        phone: Option<PhoneNumber>,
        email: Option<ContactEmail>,
        address: Option<String>,
        fields: BTreeMap<String, String>,
    ) -> Self {
        Self {
            name,
            phone,
            email,
            address: normalize_address(address),
            fields,
        }
    }
}

/// Full replacement for an existing contact's attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateContact {
    pub name: ContactName,
    pub phone: Option<PhoneNumber>,
    pub email: Option<ContactEmail>,
    pub address: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl UpdateContact {
    #[must_use]
    pub fn new(
        name: ContactName,
        phone: Option<PhoneNumber>,
        email: Option<ContactEmail>,
        address: Option<String>,
        fields: BTreeMap<String, String>,
    ) -> Self {
        Self {
            name,
            phone,
            email,
            address: normalize_address(address),
            fields,
        }
    }

    /// Whether these values would occupy the same `(name, phone)` slot as `contact`.
    pub fn collides_with(&self, contact: &Contact) -> bool {
        self.name == contact.name && self.phone == contact.phone
    }
}

impl NewContact {
    /// Whether `contact` already occupies this contact's `(name, phone)` slot.
    pub fn collides_with(&self, contact: &Contact) -> bool {
        self.name == contact.name && self.phone == contact.phone
    }
}

fn normalize_address(address: Option<String>) -> Option<String> {
    address
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
