//! Row and value definitions
//!
//! A row is an ordered mapping of column name to JSON value, one per
//! result row, with columns kept in the order the driver returned them.

use serde_json::{Map, Value};

/// One result row: column name to value, in driver column order
pub type Row = Map<String, Value>;

/// Check if a value is a scalar (boolean, number, string or null)
pub fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Short type name for error messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_values() {
        assert!(is_scalar(&json!(null)));
        assert!(is_scalar(&json!(false)));
        assert!(is_scalar(&json!(0)));
        assert!(is_scalar(&json!(1.5)));
        assert!(is_scalar(&json!("")));
        assert!(!is_scalar(&json!([1, 2])));
        assert!(!is_scalar(&json!({"a": 1})));
    }

    #[test]
    fn test_row_keeps_insertion_order() {
        let mut row = Row::new();
        row.insert("zeta".to_string(), json!(1));
        row.insert("alpha".to_string(), json!(2));
        row.insert("mid".to_string(), json!(3));

        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}
