//! Persistence layer
//!
//! Resource models never talk to a database directly; they go through a
//! [`Store`]. Every failure a store reports is passed to the caller as is.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::attributes::Attributes;
use crate::error::ModelResult;
use crate::query::{RestfulQuery, Table};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a row, assigning the integer key when absent. Returns the row as
    /// stored.
    async fn insert(&self, table: &Table, attributes: Attributes) -> ModelResult<Attributes>;

    /// Rows matching the query, ordered by key
    async fn select(&self, query: &RestfulQuery) -> ModelResult<Vec<Attributes>>;

    /// Integer keys of matching rows, ordered
    async fn pluck_keys(&self, query: &RestfulQuery) -> ModelResult<Vec<i64>>;

    /// Apply changes to matching rows; returns the number of rows changed
    async fn update(&self, query: &RestfulQuery, changes: &Attributes) -> ModelResult<u64>;

    /// Remove matching rows; returns the number of rows removed
    async fn delete(&self, query: &RestfulQuery) -> ModelResult<u64>;
}
