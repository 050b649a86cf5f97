//! Contact filters and the predicates built from them.
//!
//! A [`ContactFilter`] is a partial contact: every field left unset places no
//! constraint on the result. [`ContactPredicate::build`] turns it into a
//! disjunction of case-insensitive substring matches, one clause per set
//! field. A filter with a name *and* a phone therefore selects contacts that
//! match either of them.
//!
//! The predicate with zero clauses matches every contact. SQL engines treat
//! an empty `OR` as `false`, so stores must never render it as a disjunction;
//! [`ContactPredicate::is_match_all`] tells them to skip the `WHERE` clause.

use crate::domain::contact::Contact;

/// Partial contact used only for matching.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl ContactFilter {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// True when no field constrains the result.
    pub fn is_empty(&self) -> bool {
        normalize_needle(self.name.as_deref()).is_none()
            && normalize_needle(self.phone.as_deref()).is_none()
    }
}

/// Contact attribute a clause matches against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Phone,
}

/// Case-insensitive "contains" test on a single field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMatch {
    field: ContactField,
    needle: String,
}

impl FieldMatch {
    pub fn field(&self) -> ContactField {
        self.field
    }

    /// Lower-cased search term.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// `LIKE` pattern for this clause, escaped with `\`.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.needle.len() + 2);
        pattern.push('%');
        for c in self.needle.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        let haystack = match self.field {
            ContactField::Name => Some(contact.name.as_str()),
            ContactField::Phone => contact.phone.as_ref().map(|p| p.as_str()),
        };
        haystack.is_some_and(|value| value.to_lowercase().contains(&self.needle))
    }
}

/// Disjunction of [`FieldMatch`] clauses; no clauses means "match all".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactPredicate {
    clauses: Vec<FieldMatch>,
}

impl ContactPredicate {
    /// Predicate matching every contact.
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn build(filter: &ContactFilter) -> Self {
        let clauses = [
            (ContactField::Name, filter.name.as_deref()),
            (ContactField::Phone, filter.phone.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            normalize_needle(value).map(|needle| FieldMatch { field, needle })
        })
        .collect();

        Self { clauses }
    }

    pub fn clauses(&self) -> &[FieldMatch] {
        &self.clauses
    }

    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        self.is_match_all() || self.clauses.iter().any(|clause| clause.matches(contact))
    }
}

fn normalize_needle(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}
