use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A point lookup matched nothing.
    #[error("Item not found: {0}")]
    NotFound(i64),

    /// A required field is missing. Raised before any I/O.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backing store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        RepositoryError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Storage(format!("malformed items document: {err}"))
    }
}
