//! # SQLite Store
//!
//! Production [`Store`] implementation over sqlx. Each resource gets a
//! two-column table (`id INTEGER PRIMARY KEY AUTOINCREMENT, data TEXT`);
//! filters are pushed down with `json_extract`.
//!
//! SQLite's LIKE is ASCII-case-insensitive, so the case-sensitive `.like`
//! operator compiles to GLOB with a translated pattern and `.ilike`
//! compiles to LIKE.

use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::resource::filter::{FilterExpr, FilterOperator, FilterSet};

use super::errors::{StoreError, StoreResult};
use super::{check_field_name, with_id, Store, StoredRecord};

/// SQLite-backed document store
pub struct SqliteStore {
    pool: SqlitePool,
}

/// A typed bind parameter for a pushed-down filter
enum Bind {
    Int(i64),
    Real(f64),
    Text(String),
}

impl SqliteStore {
    /// Connect to a database and ensure the given resource tables exist
    pub async fn connect(url: &str, tables: &[&str]) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(StoreError::from)?
            .create_if_missing(true);
        // One connection: SQLite is single-writer, and an in-memory
        // database exists per connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        for table in tables {
            check_field_name(table)?;
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" \
                 (id INTEGER PRIMARY KEY AUTOINCREMENT, data TEXT NOT NULL)",
                table
            ))
            .execute(&pool)
            .await?;
        }

        Ok(Self { pool })
    }

    /// Build the WHERE clause and binds for a filter set
    fn compile_filters(filters: &FilterSet) -> StoreResult<(String, Vec<Bind>)> {
        let mut clauses = Vec::new();
        let mut binds = Vec::new();

        for filter in &filters.filters {
            check_field_name(&filter.field)?;
            let path = format!("json_extract(data, '$.{}')", filter.field);

            match filter.operator {
                FilterOperator::Eq => {
                    // JSON booleans and numbers extract as INTEGER/REAL,
                    // which never compare equal to a TEXT bind. Coerced
                    // alternatives are gated on json_type so that a stored
                    // number 1 does not match "true" and a stored boolean
                    // does not match "1", same as the in-memory matcher.
                    let kind = format!("json_type(data, '$.{}')", filter.field);
                    binds.push(Bind::Text(filter.value.clone()));

                    if filter.value == "true" || filter.value == "false" {
                        clauses.push(format!(
                            "({} = ? OR {} = '{}')",
                            path, kind, filter.value
                        ));
                    } else if let Ok(i) = filter.value.parse::<i64>() {
                        clauses.push(format!(
                            "({} = ? OR ({} IN ('integer', 'real') AND {} = ?))",
                            path, kind, path
                        ));
                        binds.push(Bind::Int(i));
                    } else if let Ok(f) = filter.value.parse::<f64>() {
                        clauses.push(format!(
                            "({} = ? OR ({} IN ('integer', 'real') AND {} = ?))",
                            path, kind, path
                        ));
                        binds.push(Bind::Real(f));
                    } else {
                        clauses.push(format!("({} = ?)", path));
                    }
                }
                FilterOperator::Like => {
                    clauses.push(format!("{} GLOB ?", path));
                    binds.push(Bind::Text(like_to_glob(&filter.value)));
                }
                FilterOperator::ILike => {
                    clauses.push(format!("{} LIKE ?", path));
                    binds.push(Bind::Text(filter.value.clone()));
                }
            }
        }

        let clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        Ok((clause, binds))
    }

    fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> StoreResult<StoredRecord> {
        let id: i64 = row.get("id");
        let raw: String = row.get("data");
        let data: Value = serde_json::from_str(&raw)?;
        Ok(StoredRecord { id, data })
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn fetch(&self, table: &str, id: i64) -> StoreResult<Option<StoredRecord>> {
        check_field_name(table)?;
        let row = sqlx::query(&format!("SELECT id, data FROM \"{}\" WHERE id = ?", table))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| Self::record_from_row(&r)).transpose()
    }

    async fn select(&self, table: &str, filters: &FilterSet) -> StoreResult<Vec<StoredRecord>> {
        check_field_name(table)?;
        let (clause, binds) = Self::compile_filters(filters)?;
        let sql = format!("SELECT id, data FROM \"{}\"{} ORDER BY id", table, clause);

        let mut query = sqlx::query(&sql);
        for bind in binds {
            query = match bind {
                Bind::Int(v) => query.bind(v),
                Bind::Real(v) => query.bind(v),
                Bind::Text(v) => query.bind(v),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(Self::record_from_row).collect()
    }

    async fn insert(&self, table: &str, data: &Value) -> StoreResult<i64> {
        check_field_name(table)?;
        let result = sqlx::query(&format!("INSERT INTO \"{}\" (data) VALUES (?)", table))
            .bind(serde_json::to_string(data)?)
            .execute(&self.pool)
            .await?;
        let id = result.last_insert_rowid();

        // Sync the row id into the document so filters can see it.
        sqlx::query(&format!("UPDATE \"{}\" SET data = ? WHERE id = ?", table))
            .bind(serde_json::to_string(&with_id(data, id))?)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn update(&self, table: &str, id: i64, data: &Value) -> StoreResult<()> {
        check_field_name(table)?;
        let result = sqlx::query(&format!("UPDATE \"{}\" SET data = ? WHERE id = ?", table))
            .bind(serde_json::to_string(&with_id(data, id))?)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// Translate a SQL LIKE pattern into an equivalent GLOB pattern
fn like_to_glob(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '%' => out.push('*'),
            '_' => out.push('?'),
            '*' => out.push_str("[*]"),
            '?' => out.push_str("[?]"),
            '[' => out.push_str("[[]"),
            other => out.push(other),
        }
    }
    out
}
