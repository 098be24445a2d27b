//! # Storage Layer
//!
//! Records are JSON documents in one table per resource. The [`Store`]
//! trait abstracts the backend: [`SqliteStore`] delegates persistence and
//! transactions to sqlx, [`MemoryStore`] backs unit and integration tests.
//!
//! Both implementations keep the `id` key inside the stored document in
//! sync with the row id, so filters and serialization see it like any
//! other field.

pub mod errors;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use serde_json::Value;

use crate::resource::filter::FilterSet;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A stored document and its row id
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: i64,
    pub data: Value,
}

/// Storage backend for resource documents
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch a single record by id
    async fn fetch(&self, table: &str, id: i64) -> StoreResult<Option<StoredRecord>>;

    /// Select all records matching a filter set
    async fn select(&self, table: &str, filters: &FilterSet) -> StoreResult<Vec<StoredRecord>>;

    /// Insert a document, returning the assigned id
    async fn insert(&self, table: &str, data: &Value) -> StoreResult<i64>;

    /// Replace the document stored under `id`
    async fn update(&self, table: &str, id: i64, data: &Value) -> StoreResult<()>;
}

/// Return a copy of `data` with its `id` key set to the row id
pub(crate) fn with_id(data: &Value, id: i64) -> Value {
    let mut doc = data.clone();
    if let Some(obj) = doc.as_object_mut() {
        obj.insert("id".to_string(), Value::from(id));
    }
    doc
}

/// Reject field names that cannot be spliced into a query path
pub(crate) fn check_field_name(field: &str) -> StoreResult<()> {
    if !field.is_empty() && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(StoreError::InvalidField(field.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_id_overwrites() {
        let doc = with_id(&json!({"id": 0, "name": "x"}), 7);
        assert_eq!(doc["id"], 7);
        assert_eq!(doc["name"], "x");
    }

    #[test]
    fn test_field_name_check() {
        assert!(check_field_name("name").is_ok());
        assert!(check_field_name("twitter_handle").is_ok());
        assert!(check_field_name("").is_err());
        assert!(check_field_name("name'; DROP TABLE users; --").is_err());
        assert!(check_field_name("a.b").is_err());
    }
}
