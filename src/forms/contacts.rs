use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::contact::{NewContact, UpdateContact};
use crate::domain::types::{ContactEmail, ContactName, PhoneNumber};
use crate::forms::FormError;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
/// Contact payload submitted for creation or replacement.
pub struct ContactForm {
    /// Identifier echoed by clients; only used to detect collisions on create.
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 512))]
    pub address: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_custom_fields"))]
    pub fields: BTreeMap<String, String>,
}

impl ContactForm {
    /// Treats whitespace-only optional values as absent.
    fn without_blanks(mut self) -> Self {
        self.phone = non_blank(self.phone);
        self.email = non_blank(self.email);
        self.address = non_blank(self.address);
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_custom_fields(fields: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    for key in fields.keys() {
        let key = key.trim();
        if key.is_empty() {
            return Err(ValidationError::new("empty_field_name"));
        }
        // Keys are stored trimmed; " a" and "a" would overwrite each other.
        if !seen.insert(key) {
            return Err(ValidationError::new("duplicate_field_name"));
        }
    }
    Ok(())
}

/// Shape-checked contact values ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPayload {
    pub name: ContactName,
    pub phone: Option<PhoneNumber>,
    pub email: Option<ContactEmail>,
    pub address: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl TryFrom<ContactForm> for ContactPayload {
    type Error = FormError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        let form = form.without_blanks();
        form.validate()?;

        let phone = form.phone.map(PhoneNumber::new).transpose()?;
        let email = form.email.map(ContactEmail::new).transpose()?;
        let fields = form
            .fields
            .into_iter()
            .map(|(key, value)| (key.trim().to_string(), value))
            .collect();

        Ok(Self {
            name: ContactName::new(form.name)?,
            phone,
            email,
            address: form.address,
            fields,
        })
    }
}

impl ContactPayload {
    pub fn into_new_contact(self) -> NewContact {
        NewContact::new(self.name, self.phone, self.email, self.address, self.fields)
    }

    pub fn into_update(self) -> UpdateContact {
        UpdateContact::new(self.name, self.phone, self.email, self.address, self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, phone: Option<&str>) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            phone: phone.map(str::to_string),
            ..ContactForm::default()
        }
    }

    #[test]
    fn valid_form_becomes_payload() {
        let payload = ContactPayload::try_from(form(" Ann ", Some("555-1"))).unwrap();
        assert_eq!(payload.name.as_str(), "Ann");
        assert_eq!(payload.phone.unwrap().as_str(), "555-1");
    }

    #[test]
    fn missing_name_is_rejected() {
        assert!(matches!(
            ContactPayload::try_from(form("", None)),
            Err(FormError::Validation(_))
        ));
        assert!(matches!(
            ContactPayload::try_from(form("   ", None)),
            Err(FormError::TypeConstraint(_))
        ));
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(ContactPayload::try_from(form("Ann", Some("phone?"))).is_err());

        let bad_email = ContactForm {
            email: Some("not-an-email".to_string()),
            ..form("Ann", None)
        };
        assert!(ContactPayload::try_from(bad_email).is_err());

        let bad_fields = ContactForm {
            fields: BTreeMap::from([(" ".to_string(), "x".to_string())]),
            ..form("Ann", None)
        };
        assert!(ContactPayload::try_from(bad_fields).is_err());
    }

    #[test]
    fn field_names_colliding_after_trim_are_rejected() {
        let colliding = ContactForm {
            fields: BTreeMap::from([
                ("a".to_string(), "1".to_string()),
                (" a".to_string(), "2".to_string()),
            ]),
            ..form("Ann", None)
        };
        assert!(matches!(
            ContactPayload::try_from(colliding),
            Err(FormError::Validation(_))
        ));

        let padded = ContactForm {
            fields: BTreeMap::from([(" company ".to_string(), "Acme".to_string())]),
            ..form("Ann", None)
        };
        let payload = ContactPayload::try_from(padded).unwrap();
        assert_eq!(payload.fields.get("company").map(String::as_str), Some("Acme"));
    }

    #[test]
    fn blank_optional_values_are_dropped() {
        let blank = ContactForm {
            email: Some("  ".to_string()),
            address: Some("  ".to_string()),
            ..form("Ann", Some(" "))
        };
        let contact = ContactPayload::try_from(blank).unwrap().into_new_contact();
        assert_eq!(contact.phone, None);
        assert_eq!(contact.email, None);
        assert_eq!(contact.address, None);
    }

    #[test]
    fn form_deserializes_without_optional_keys() {
        let form: ContactForm = serde_json::from_str(r#"{"name":"Ann","phone":"555-1"}"#).unwrap();
        assert_eq!(form.id, None);
        assert!(form.fields.is_empty());
    }
}
