//! Query Builder - conditions over a single resource table
//!
//! Queries here are deliberately small: equality, membership and null checks
//! combined with AND. That is all the identifier resolution and deletion
//! paths need, and it keeps every store able to evaluate them.

use serde_json::Value;
use uuid::Uuid;

use crate::attributes::Attributes;
use crate::identifier::is_external_id;
use crate::model::RestfulModel;

/// A table and its integer key column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Table {
    pub name: &'static str,
    pub primary_key: &'static str,
}

impl Table {
    pub const fn new(name: &'static str, primary_key: &'static str) -> Self {
        Self { name, primary_key }
    }

    pub fn of<M: RestfulModel>() -> Self {
        Self::new(M::table_name(), M::primary_key_name())
    }
}

/// WHERE condition
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq { column: String, value: Value },
    In { column: String, values: Vec<Value> },
    IsNull { column: String },
}

impl Condition {
    pub fn column(&self) -> &str {
        match self {
            Condition::Eq { column, .. }
            | Condition::In { column, .. }
            | Condition::IsNull { column } => column,
        }
    }

    /// Evaluate against a stored row
    pub fn matches(&self, row: &Attributes) -> bool {
        let stored = row.get(self.column()).unwrap_or(&Value::Null);
        match self {
            Condition::Eq { value, .. } => values_equal(stored, value),
            Condition::In { values, .. } => values.iter().any(|v| values_equal(stored, v)),
            Condition::IsNull { .. } => stored.is_null(),
        }
    }
}

/// UUIDs compare case-insensitively, like a native uuid column would
pub(crate) fn values_equal(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::String(a), Value::String(b)) if is_external_id(a) && is_external_id(b) => {
            a.eq_ignore_ascii_case(b)
        }
        _ => stored == wanted,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestfulQuery {
    table: Table,
    conditions: Vec<Condition>,
}

impl RestfulQuery {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            conditions: Vec::new(),
        }
    }

    /// Query over a model's table; soft-deleting models only see rows that
    /// are not trashed
    pub fn for_model<M: RestfulModel>() -> Self {
        let query = Self::new(Table::of::<M>());
        if M::uses_soft_deletes() {
            query.where_null("deleted_at")
        } else {
            query
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn where_in(mut self, column: &str, values: Vec<Value>) -> Self {
        self.conditions.push(Condition::In {
            column: column.to_string(),
            values,
        });
        self
    }

    pub fn where_null(mut self, column: &str) -> Self {
        self.conditions.push(Condition::IsNull {
            column: column.to_string(),
        });
        self
    }

    pub fn where_key(self, key: i64) -> Self {
        let column = self.table.primary_key;
        self.where_eq(column, key)
    }

    pub fn where_key_in(self, keys: &[i64]) -> Self {
        let column = self.table.primary_key;
        self.where_in(column, keys.iter().map(|k| Value::from(*k)).collect())
    }

    pub fn where_uuid(self, column: &str, uuid: Uuid) -> Self {
        self.where_eq(column, uuid.hyphenated().to_string())
    }

    pub fn where_uuid_in(self, column: &str, uuids: &[Uuid]) -> Self {
        let values = uuids
            .iter()
            .map(|u| Value::String(u.hyphenated().to_string()))
            .collect();
        self.where_in(column, values)
    }

    /// Whether a stored row satisfies every condition
    pub fn matches(&self, row: &Attributes) -> bool {
        self.conditions.iter().all(|c| c.matches(row))
    }
}
