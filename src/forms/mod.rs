//! Payload definitions accepted by the contacts API.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod contacts;

#[derive(Debug, Error)]
/// Errors that can occur when processing submitted payloads.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    TypeConstraint(#[from] TypeConstraintError),
}
