//! Database-specific error types and conversions.

use quill_core::error::Error;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Error from the libsql engine.
    #[error("libsql error: {0}")]
    Libsql(#[from] libsql::Error),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// A stored row could not be decoded into its domain model.
    #[error("Row decode failed: {0}")]
    Decode(String),

    /// Record not found.
    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for Error {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => Error::NotFound { entity, id },
            other => Error::Database(other.to_string()),
        }
    }
}
