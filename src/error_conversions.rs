//! Conversions out of [`TypeConstraintError`] and the HTTP status mapping
//! for [`ServiceError`].

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;
use crate::services::errors::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::BadResource(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod http {
    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, ResponseError};

    use crate::services::errors::ServiceError;

    /// Domain failures become bodiless responses with a distinct status each.
    impl ResponseError for ServiceError {
        fn status_code(&self) -> StatusCode {
            match self {
                ServiceError::NotFound => StatusCode::NOT_FOUND,
                ServiceError::AlreadyExists => StatusCode::CONFLICT,
                ServiceError::BadResource(_) => StatusCode::BAD_REQUEST,
                ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }

        fn error_response(&self) -> HttpResponse {
            HttpResponse::build(self.status_code()).finish()
        }
    }
}
