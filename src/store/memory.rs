//! # In-Memory Store
//!
//! HashMap-backed [`Store`] implementation for tests and throwaway
//! deployments. Filter evaluation reuses the same [`FilterSet`] matching
//! the SQLite backend pushes down, so both agree on semantics.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::resource::filter::FilterSet;

use super::errors::{StoreError, StoreResult};
use super::{check_field_name, with_id, Store, StoredRecord};

/// In-memory document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<StoredRecord>>>,
    next_ids: RwLock<HashMap<String, i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a table (including inactive ones)
    pub fn len(&self, table: &str) -> usize {
        self.tables
            .read()
            .map(|t| t.get(table).map(|r| r.len()).unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn fetch(&self, table: &str, id: i64) -> StoreResult<Option<StoredRecord>> {
        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tables
            .get(table)
            .and_then(|records| records.iter().find(|r| r.id == id))
            .cloned())
    }

    async fn select(&self, table: &str, filters: &FilterSet) -> StoreResult<Vec<StoredRecord>> {
        for filter in &filters.filters {
            check_field_name(&filter.field)?;
        }

        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tables
            .get(table)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| filters.matches(&r.data))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, table: &str, data: &Value) -> StoreResult<i64> {
        let mut next_ids = self.next_ids.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;

        let id = next_ids.entry(table.to_string()).or_insert(0);
        *id += 1;
        let id = *id;

        tables.entry(table.to_string()).or_default().push(StoredRecord {
            id,
            data: with_id(data, id),
        });

        Ok(id)
    }

    async fn update(&self, table: &str, id: i64, data: &Value) -> StoreResult<()> {
        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        let record = tables
            .get_mut(table)
            .and_then(|records| records.iter_mut().find(|r| r.id == id))
            .ok_or(StoreError::NotFound)?;

        record.data = with_id(data, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::filter::{FilterExpr, FilterOperator};
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryStore::new();

        let first = store.insert("things", &json!({"name": "a"})).await.unwrap();
        let second = store.insert("things", &json!({"name": "b"})).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[tokio::test]
    async fn test_insert_syncs_id_into_document() {
        let store = MemoryStore::new();

        let id = store.insert("things", &json!({"id": 0, "name": "a"})).await.unwrap();
        let record = store.fetch("things", id).await.unwrap().unwrap();

        assert_eq!(record.data["id"], id);
    }

    #[tokio::test]
    async fn test_fetch_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.fetch("things", 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_select_with_filters() {
        let store = MemoryStore::new();
        store
            .insert("things", &json!({"name": "Johnson", "active": true}))
            .await
            .unwrap();
        store
            .insert("things", &json!({"name": "Smith", "active": false}))
            .await
            .unwrap();

        let mut filters = FilterSet::new();
        filters.push(FilterExpr::eq("active", "true"));
        let records = store.select("things", &filters).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data["name"], "Johnson");

        let mut filters = FilterSet::new();
        filters.push(FilterExpr::new("name", FilterOperator::Like, "%son"));
        let records = store.select("things", &filters).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_document() {
        let store = MemoryStore::new();
        let id = store.insert("things", &json!({"name": "a"})).await.unwrap();

        store.update("things", id, &json!({"name": "b"})).await.unwrap();
        let record = store.fetch("things", id).await.unwrap().unwrap();
        assert_eq!(record.data["name"], "b");
        assert_eq!(record.data["id"], id);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let result = store.update("things", 9, &json!({})).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_select_rejects_bad_field_name() {
        let store = MemoryStore::new();
        let mut filters = FilterSet::new();
        filters.push(FilterExpr::eq("no such field", "x"));
        assert!(matches!(
            store.select("things", &filters).await,
            Err(StoreError::InvalidField(_))
        ));
    }
}
