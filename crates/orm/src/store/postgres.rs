//! PostgreSQL store backed by an sqlx pool
//!
//! Rows are read back through `row_to_json`, so attribute order follows the
//! table's column order. External keys are expected in native `uuid` columns.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions};
use sqlx::query::Query;
use sqlx::{Postgres, Row};
use uuid::Uuid;

use super::Store;
use crate::attributes::Attributes;
use crate::error::{ModelError, ModelResult};
use crate::identifier::is_external_id;
use crate::query::{insert_sql, RestfulQuery, SqlStatement, Table};

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a fresh pool
    pub async fn connect(database_url: &str, max_connections: u32) -> ModelResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::info!(max_connections, "connected postgres store");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_rows(&self, statement: &SqlStatement) -> ModelResult<Vec<Attributes>> {
        tracing::debug!(sql = %statement.sql, params = statement.params.len(), "executing query");
        let rows = bind_all(sqlx::query(&statement.sql), &statement.params)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| Attributes::from_value(row.try_get::<Value, _>(0)?))
            .collect()
    }

    async fn execute(&self, statement: &SqlStatement) -> ModelResult<u64> {
        tracing::debug!(sql = %statement.sql, params = statement.params.len(), "executing statement");
        let result = bind_all(sqlx::query(&statement.sql), &statement.params)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn bind_all<'q>(query: PgQuery<'q>, params: &[Value]) -> PgQuery<'q> {
    params.iter().fold(query, bind_json_value)
}

fn bind_json_value<'q>(query: PgQuery<'q>, value: &Value) -> PgQuery<'q> {
    match value {
        // Statements render nulls as literals; this only covers hand-built ones
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(f) = n.as_f64() {
                query.bind(f)
            } else {
                query.bind(n.to_string())
            }
        }
        Value::String(s) if is_external_id(s) => match Uuid::parse_str(s) {
            Ok(uuid) => query.bind(uuid),
            Err(_) => query.bind(s.clone()),
        },
        Value::String(s) => query.bind(s.clone()),
        Value::Array(_) | Value::Object(_) => query.bind(sqlx::types::Json(value.clone())),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert(&self, table: &Table, attributes: Attributes) -> ModelResult<Attributes> {
        let statement = insert_sql(table, &attributes);
        let mut rows = self.fetch_rows(&statement).await?;
        rows.pop()
            .ok_or_else(|| ModelError::Database(format!("insert into {} returned no row", table.name)))
    }

    async fn select(&self, query: &RestfulQuery) -> ModelResult<Vec<Attributes>> {
        self.fetch_rows(&query.to_select_sql()).await
    }

    async fn pluck_keys(&self, query: &RestfulQuery) -> ModelResult<Vec<i64>> {
        let statement = query.to_pluck_keys_sql();
        let rows = bind_all(sqlx::query(&statement.sql), &statement.params)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<i64, _>(0).map_err(Into::into))
            .collect()
    }

    async fn update(&self, query: &RestfulQuery, changes: &Attributes) -> ModelResult<u64> {
        if changes.is_empty() {
            return Ok(0);
        }
        self.execute(&query.to_update_sql(changes)).await
    }

    async fn delete(&self, query: &RestfulQuery) -> ModelResult<u64> {
        self.execute(&query.to_delete_sql()).await
    }
}
