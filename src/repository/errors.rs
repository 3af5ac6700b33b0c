use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors raised by the data-access layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    /// A typed reference points at a row that does not exist.
    #[error("referenced {0} does not exist")]
    MissingReference(&'static str),
    #[error("record already exists")]
    Duplicate,
    /// Foreign-key constraint rejected the write; carries the constraint name.
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),
    #[error("database error: {0}")]
    Database(DieselError),
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
}

impl From<DieselError> for RepositoryError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => Self::Duplicate,
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation(info.constraint_name().unwrap_or_default().to_string())
            }
            other => Self::Database(other),
        }
    }
}
