//! Query layer: identifier-aware query builder, SQL rendering and the model
//! repository
//!
//! - `builder`: `Table`, `Condition` and the `RestfulQuery` builder
//! - `sql`: parameterised PostgreSQL rendering of queries
//! - `repository`: create/update/find/destroy for one model type

pub mod builder;
pub mod repository;
pub mod sql;

pub use builder::{Condition, RestfulQuery, Table};
pub use repository::Repository;
pub use sql::{insert_sql, quote_identifier, SqlStatement};
