use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::{error::HttpError, models::applicationmodel::ApplicationStatus};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Application {0} not found")]
    ApplicationNotFound(Uuid),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("This job is no longer accepting applications")]
    JobNotOpen(Uuid),

    #[error("You have already applied for this job")]
    DuplicateApplication,

    #[error("{0} is already registered")]
    DuplicateKey(String),

    #[error("Application {0} cannot move from {1:?} to {2:?}")]
    InvalidTransition(Uuid, ApplicationStatus, ApplicationStatus),

    #[error("User {0} is not authorized to perform this action on {1}")]
    Forbidden(Uuid, Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::JobNotFound(_)
            | ServiceError::ApplicationNotFound(_)
            | ServiceError::UserNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::JobNotOpen(_)
            | ServiceError::InvalidTransition(_, _, _)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::DuplicateApplication | ServiceError::DuplicateKey(_) => {
                StatusCode::CONFLICT
            }

            ServiceError::Forbidden(_, _) => StatusCode::FORBIDDEN,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        HttpError::new(error.to_string(), status)
    }
}

/// Classify a store failure as a uniqueness violation (Postgres 23505).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let id = Uuid::new_v4();

        assert_eq!(
            ServiceError::JobNotFound(id).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::JobNotOpen(id).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::DuplicateApplication.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::DuplicateKey("254712345678".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Forbidden(id, id).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::InvalidTransition(
                id,
                ApplicationStatus::Accepted,
                ApplicationStatus::Pending
            )
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_http_error_conversion_keeps_status() {
        let err: HttpError = ServiceError::DuplicateApplication.into();
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err: HttpError = ServiceError::JobNotFound(Uuid::new_v4()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_row_not_found_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
