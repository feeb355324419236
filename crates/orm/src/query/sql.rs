//! PostgreSQL rendering for resource queries
//!
//! Every non-null value is bound as a parameter; identifiers are always
//! quoted. Rows come back as `row_to_json(t)` so column order survives into
//! the model's attribute ordering.
//!
//! Nulls are written as `NULL` literals so they take the column's type.
//! Parameters for the timestamp columns the repository maintains are cast to
//! `timestamptz`.

use serde_json::Value;

use super::builder::{Condition, RestfulQuery, Table};
use crate::attributes::Attributes;

/// SQL text plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Quote an identifier, doubling embedded quotes
pub fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Columns written with RFC 3339 text that the database stores as
/// `timestamptz`
pub const TIMESTAMP_COLUMNS: [&str; 3] = ["created_at", "updated_at", "deleted_at"];

struct Params(Vec<Value>);

impl Params {
    /// Placeholder for a value headed to `column`
    fn push(&mut self, column: &str, value: &Value) -> String {
        if value.is_null() {
            return "NULL".to_string();
        }
        self.0.push(value.clone());
        if TIMESTAMP_COLUMNS.contains(&column) {
            format!("${}::timestamptz", self.0.len())
        } else {
            format!("${}", self.0.len())
        }
    }
}

fn where_clause(conditions: &[Condition], params: &mut Params) -> String {
    if conditions.is_empty() {
        return String::new();
    }

    let rendered: Vec<String> = conditions
        .iter()
        .map(|condition| {
            let name = condition.column();
            let column = quote_identifier(name);
            match condition {
                Condition::Eq { value, .. } if value.is_null() => format!("{} IS NULL", column),
                Condition::Eq { value, .. } => format!("{} = {}", column, params.push(name, value)),
                Condition::In { values, .. } if values.is_empty() => "1 = 0".to_string(),
                Condition::In { values, .. } => {
                    let placeholders: Vec<String> =
                        values.iter().map(|v| params.push(name, v)).collect();
                    format!("{} IN ({})", column, placeholders.join(", "))
                }
                Condition::IsNull { .. } => format!("{} IS NULL", column),
            }
        })
        .collect();

    format!(" WHERE {}", rendered.join(" AND "))
}

impl RestfulQuery {
    /// `SELECT` full rows as JSON, ordered by key
    pub fn to_select_sql(&self) -> SqlStatement {
        let mut params = Params(Vec::new());
        let table = self.table();
        let sql = format!(
            "SELECT row_to_json(t) FROM {} AS t{} ORDER BY {}",
            quote_identifier(table.name),
            where_clause(self.conditions(), &mut params),
            quote_identifier(table.primary_key),
        );
        SqlStatement { sql, params: params.0 }
    }

    /// `SELECT` only the integer keys of matching rows, widened to `bigint`
    pub fn to_pluck_keys_sql(&self) -> SqlStatement {
        let mut params = Params(Vec::new());
        let table = self.table();
        let key = quote_identifier(table.primary_key);
        let sql = format!(
            "SELECT {}::bigint FROM {}{} ORDER BY {}",
            key,
            quote_identifier(table.name),
            where_clause(self.conditions(), &mut params),
            key,
        );
        SqlStatement { sql, params: params.0 }
    }

    pub fn to_update_sql(&self, changes: &Attributes) -> SqlStatement {
        let mut params = Params(Vec::new());
        let assignments: Vec<String> = changes
            .iter()
            .map(|(column, value)| {
                format!("{} = {}", quote_identifier(column), params.push(column, value))
            })
            .collect();
        let sql = format!(
            "UPDATE {} SET {}{}",
            quote_identifier(self.table().name),
            assignments.join(", "),
            where_clause(self.conditions(), &mut params),
        );
        SqlStatement { sql, params: params.0 }
    }

    pub fn to_delete_sql(&self) -> SqlStatement {
        let mut params = Params(Vec::new());
        let sql = format!(
            "DELETE FROM {}{}",
            quote_identifier(self.table().name),
            where_clause(self.conditions(), &mut params),
        );
        SqlStatement { sql, params: params.0 }
    }
}

/// `INSERT` returning the stored row as JSON
pub fn insert_sql(table: &Table, attributes: &Attributes) -> SqlStatement {
    let name = quote_identifier(table.name);
    if attributes.is_empty() {
        return SqlStatement {
            sql: format!("INSERT INTO {} AS t DEFAULT VALUES RETURNING row_to_json(t)", name),
            params: Vec::new(),
        };
    }

    let mut params = Params(Vec::new());
    let mut columns = Vec::with_capacity(attributes.len());
    let mut placeholders = Vec::with_capacity(attributes.len());
    for (column, value) in attributes.iter() {
        columns.push(quote_identifier(column));
        placeholders.push(params.push(column, value));
    }

    SqlStatement {
        sql: format!(
            "INSERT INTO {} AS t ({}) VALUES ({}) RETURNING row_to_json(t)",
            name,
            columns.join(", "),
            placeholders.join(", "),
        ),
        params: params.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    const USERS: Table = Table::new("users", "user_id");

    #[test]
    fn test_pluck_keys_by_uuid() {
        let uuids = [
            Uuid::parse_str("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap(),
            Uuid::parse_str("9b2e6b6c-1f0a-4d1e-8f5e-0c2b1d3a4e5f").unwrap(),
        ];
        let statement = RestfulQuery::new(USERS)
            .where_uuid_in("user_uuid", &uuids)
            .where_null("deleted_at")
            .to_pluck_keys_sql();

        assert_eq!(
            statement.sql,
            r#"SELECT "user_id"::bigint FROM "users" WHERE "user_uuid" IN ($1, $2) AND "deleted_at" IS NULL ORDER BY "user_id""#
        );
        assert_eq!(statement.params[0], json!("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
    }

    #[test]
    fn test_delete_by_keys() {
        let statement = RestfulQuery::new(USERS).where_key_in(&[4, 5]).to_delete_sql();
        assert_eq!(statement.sql, r#"DELETE FROM "users" WHERE "user_id" IN ($1, $2)"#);
        assert_eq!(statement.params, vec![json!(4), json!(5)]);
    }

    #[test]
    fn test_empty_key_list_deletes_nothing() {
        let statement = RestfulQuery::new(USERS).where_key_in(&[]).to_delete_sql();
        assert_eq!(statement.sql, r#"DELETE FROM "users" WHERE 1 = 0"#);
    }

    #[test]
    fn test_soft_delete_casts_timestamp() {
        let changes = Attributes::new().with("deleted_at", "2024-01-01T00:00:00+00:00");
        let statement = RestfulQuery::new(USERS)
            .where_key(7)
            .where_null("deleted_at")
            .to_update_sql(&changes);

        assert_eq!(
            statement.sql,
            r#"UPDATE "users" SET "deleted_at" = $1::timestamptz WHERE "user_id" = $2 AND "deleted_at" IS NULL"#
        );
        assert_eq!(statement.params, vec![json!("2024-01-01T00:00:00+00:00"), json!(7)]);
    }

    #[test]
    fn test_insert_casts_timestamps() {
        let attrs = Attributes::new()
            .with("title", "Hello")
            .with("created_at", "2024-01-01T00:00:00+00:00")
            .with("updated_at", "2024-01-01T00:00:00+00:00");
        let statement = insert_sql(&USERS, &attrs);

        assert_eq!(
            statement.sql,
            r#"INSERT INTO "users" AS t ("title", "created_at", "updated_at") VALUES ($1, $2::timestamptz, $3::timestamptz) RETURNING row_to_json(t)"#
        );
        assert_eq!(statement.params.len(), 3);
    }

    #[test]
    fn test_nulls_are_literals() {
        let attrs = Attributes::new().with("name", "Ada").with("age", Value::Null);
        let statement = insert_sql(&USERS, &attrs);
        assert_eq!(
            statement.sql,
            r#"INSERT INTO "users" AS t ("name", "age") VALUES ($1, NULL) RETURNING row_to_json(t)"#
        );
        assert_eq!(statement.params, vec![json!("Ada")]);

        let changes = Attributes::new().with("deleted_at", Value::Null);
        let statement = RestfulQuery::new(USERS)
            .where_eq("age", Value::Null)
            .to_update_sql(&changes);
        assert_eq!(
            statement.sql,
            r#"UPDATE "users" SET "deleted_at" = NULL WHERE "age" IS NULL"#
        );
        assert!(statement.params.is_empty());
    }

    #[test]
    fn test_insert_keeps_attribute_order() {
        let attrs = Attributes::new().with("name", "Ada").with("user_uuid", "u");
        let statement = insert_sql(&USERS, &attrs);

        assert_eq!(
            statement.sql,
            r#"INSERT INTO "users" AS t ("name", "user_uuid") VALUES ($1, $2) RETURNING row_to_json(t)"#
        );
        assert_eq!(
            insert_sql(&USERS, &Attributes::new()).sql,
            r#"INSERT INTO "users" AS t DEFAULT VALUES RETURNING row_to_json(t)"#
        );
    }

    #[test]
    fn test_identifiers_are_quoted() {
        assert_eq!(quote_identifier(r#"we"ird"#), r#""we""ird""#);
    }
}
