use thiserror::Error;

use crate::repository::RepositoryError;

pub mod orders;
pub mod payments;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the order and payment services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,
    /// Submitted data failed validation.
    #[error("invalid input: {0}")]
    Form(String),
    /// The request is valid but clashes with stored state.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::MissingReference(what) => Self::Form(format!("unknown {what}")),
            RepositoryError::Duplicate => Self::Conflict("record already exists".to_string()),
            RepositoryError::ForeignKeyViolation(constraint) => Self::Conflict(constraint),
            err @ (RepositoryError::Database(_) | RepositoryError::Pool(_)) => {
                log::error!("Repository failure: {err}");
                Self::Internal(err.to_string())
            }
        }
    }
}
