//! In-memory store
//!
//! Behaves like a single-node database table per model: keys auto-increment
//! per table and never get reused, and unique columns can be declared to
//! stand in for schema constraints.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::collections::BTreeMap;

use super::Store;
use crate::attributes::Attributes;
use crate::error::{ModelError, ModelResult};
use crate::query::builder::values_equal;
use crate::query::{RestfulQuery, Table};

#[derive(Debug, Default)]
struct MemoryTable {
    rows: BTreeMap<i64, Attributes>,
    last_key: i64,
    unique_columns: Vec<String>,
}

impl MemoryTable {
    fn check_unique(&self, key: i64, row: &Attributes, table: &str) -> ModelResult<()> {
        for column in &self.unique_columns {
            let Some(value) = row.get(column).filter(|v| !v.is_null()) else {
                continue;
            };
            let taken = self
                .rows
                .iter()
                .any(|(other, existing)| {
                    *other != key && existing.get(column).is_some_and(|v| values_equal(v, value))
                });
            if taken {
                return Err(ModelError::Database(format!(
                    "duplicate key value violates unique constraint \"{}_{}_unique\"",
                    table, column
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: DashMap<&'static str, MemoryTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a unique column on a table
    pub fn with_unique_column(self, table: &'static str, column: &str) -> Self {
        self.tables
            .entry(table)
            .or_default()
            .unique_columns
            .push(column.to_string());
        self
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.tables.get(table).map(|t| t.rows.len()).unwrap_or(0)
    }

    /// Every stored row of a table, trashed ones included
    pub fn rows(&self, table: &str) -> Vec<Attributes> {
        self.tables
            .get(table)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, table: &Table, mut attributes: Attributes) -> ModelResult<Attributes> {
        let mut stored = self.tables.entry(table.name).or_default();

        let key = match attributes.get(table.primary_key).and_then(Value::as_i64) {
            Some(key) if stored.rows.contains_key(&key) => {
                return Err(ModelError::Database(format!(
                    "duplicate key value violates unique constraint \"{}_pkey\"",
                    table.name
                )));
            }
            Some(key) => key,
            None => stored.last_key + 1,
        };

        attributes.set(table.primary_key, key);
        stored.check_unique(key, &attributes, table.name)?;
        stored.last_key = stored.last_key.max(key);
        stored.rows.insert(key, attributes.clone());

        tracing::trace!(table = table.name, key, "row inserted");
        Ok(attributes)
    }

    async fn select(&self, query: &RestfulQuery) -> ModelResult<Vec<Attributes>> {
        Ok(self
            .tables
            .get(query.table().name)
            .map(|t| t.rows.values().filter(|row| query.matches(row)).cloned().collect())
            .unwrap_or_default())
    }

    async fn pluck_keys(&self, query: &RestfulQuery) -> ModelResult<Vec<i64>> {
        Ok(self
            .tables
            .get(query.table().name)
            .map(|t| {
                t.rows
                    .iter()
                    .filter(|(_, row)| query.matches(row))
                    .map(|(key, _)| *key)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(&self, query: &RestfulQuery, changes: &Attributes) -> ModelResult<u64> {
        let table = query.table();
        let Some(mut stored) = self.tables.get_mut(table.name) else {
            return Ok(0);
        };

        let mut updated = Vec::new();
        for (key, row) in stored.rows.iter().filter(|(_, row)| query.matches(row)) {
            let mut row = row.clone();
            for (column, value) in changes.iter() {
                row.set(column, value.clone());
            }
            stored.check_unique(*key, &row, table.name)?;
            updated.push((*key, row));
        }

        let count = updated.len() as u64;
        for (key, row) in updated {
            stored.rows.insert(key, row);
        }
        Ok(count)
    }

    async fn delete(&self, query: &RestfulQuery) -> ModelResult<u64> {
        let Some(mut stored) = self.tables.get_mut(query.table().name) else {
            return Ok(0);
        };

        let before = stored.rows.len();
        stored.rows.retain(|_, row| !query.matches(row));
        Ok((before - stored.rows.len()) as u64)
    }
}
