use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::contact::{
    Contact as DomainContact, NewContact as DomainNewContact,
    UpdateContact as DomainUpdateContact,
};
use crate::domain::types::{
    ContactEmail, ContactId, ContactName, PhoneNumber, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::contacts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::contact::Contact`].
pub struct Contact {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// JSON object with the contact's custom fields.
    pub fields: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contacts)]
/// Insertable form of [`Contact`].
pub struct NewContact<'a> {
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub fields: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::contacts)]
#[diesel(treat_none_as_null = true)]
/// Data used when replacing a [`Contact`] record.
pub struct UpdateContact<'a> {
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub fields: String,
    pub updated_at: NaiveDateTime,
}

fn encode_fields(fields: &BTreeMap<String, String>) -> String {
    // A string-to-string map always serializes.
    serde_json::to_string(fields).unwrap_or_else(|_| "{}".to_string())
}

fn decode_fields(raw: &str) -> Result<BTreeMap<String, String>, TypeConstraintError> {
    serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("custom fields: {e}")))
}

impl TryFrom<Contact> for DomainContact {
    type Error = TypeConstraintError;

    fn try_from(contact: Contact) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ContactId::new(contact.id)?,
            name: ContactName::new(contact.name)?,
            phone: contact.phone.map(PhoneNumber::new).transpose()?,
            email: contact.email.map(ContactEmail::new).transpose()?,
            address: contact.address,
            fields: decode_fields(&contact.fields)?,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        })
    }
}

impl<'a> NewContact<'a> {
    pub fn from_domain(contact: &'a DomainNewContact, now: NaiveDateTime) -> Self {
        Self {
            name: contact.name.as_str(),
            phone: contact.phone.as_ref().map(|p| p.as_str()),
            email: contact.email.as_ref().map(|e| e.as_str()),
            address: contact.address.as_deref(),
            fields: encode_fields(&contact.fields),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateContact<'a> {
    pub fn from_domain(contact: &'a DomainUpdateContact, now: NaiveDateTime) -> Self {
        Self {
            name: contact.name.as_str(),
            phone: contact.phone.as_ref().map(|p| p.as_str()),
            email: contact.email.as_ref().map(|e| e.as_str()),
            address: contact.address.as_deref(),
            fields: encode_fields(&contact.fields),
            updated_at: now,
        }
    }
}
