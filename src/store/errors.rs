//! # Store Errors
//!
//! Error types for the persistence layer.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record does not exist
    #[error("record not found")]
    NotFound,

    /// Constraint violation (unique index, foreign key)
    #[error("integrity error: {0}")]
    Integrity(String),

    /// Stored document failed to round-trip through serde
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Field name not usable in a query
    #[error("invalid field name: {0}")]
    InvalidField(String),

    /// In-memory lock poisoned
    #[error("lock poisoned")]
    LockPoisoned,

    /// Underlying database error
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() || db.is_foreign_key_violation() => {
                StoreError::Integrity(db.to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidDocument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::NotFound));
    }
}
