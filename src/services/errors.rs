use thiserror::Error;

use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

/// Failures surfaced by the service layer.
///
/// `NotFound`, `AlreadyExists` and `BadResource` are expected domain
/// failures; `Internal` covers everything the caller cannot fix.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("resource not found")]
    NotFound,

    #[error("resource already exists")]
    AlreadyExists,

    #[error("bad resource: {0}")]
    BadResource(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Duplicate(_) => ServiceError::AlreadyExists,
            RepositoryError::ConstraintViolation(message) => ServiceError::BadResource(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::BadResource(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infrastructure_failures_are_not_reported_as_missing() {
        let err = ServiceError::from(RepositoryError::ConnectionError("down".into()));
        assert!(matches!(err, ServiceError::Internal(_)));

        let err = ServiceError::from(RepositoryError::ValidationError("bad row".into()));
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn domain_failures_keep_their_kind() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::Duplicate("dup".into())),
            ServiceError::AlreadyExists
        ));
    }
}
