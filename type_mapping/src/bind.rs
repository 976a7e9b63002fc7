//! Parameter binding
//!
//! This module binds JSON values as positional parameters of a MySQL
//! statement.

use serde_json::Value;
use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;

/// Bind one JSON value to the next `?` placeholder of a query
pub fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::String(s) => query.bind(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(u) = n.as_u64() {
                query.bind(u)
            } else if let Some(f) = n.as_f64() {
                query.bind(f)
            } else {
                query.bind(n.to_string())
            }
        }
        Value::Bool(b) => query.bind(*b),
        Value::Null => query.bind(Option::<String>::None),
        // arrays and objects go in as JSON text
        other => query.bind(other.to_string()),
    }
}
