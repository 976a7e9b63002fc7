//! SQL literal rendering
//!
//! This module turns scalar JSON values into the text that is interpolated
//! into rendered SELECT statements.

use crate::types::is_scalar;
use serde_json::Value;

/// Render a scalar as literal text, `None` for arrays and objects.
///
/// Booleans render as `1`/`0` (MySQL has no boolean literal distinct from
/// TINYINT), null renders as the empty string.
pub fn literal_text(value: &Value) -> Option<String> {
    if !is_scalar(value) {
        return None;
    }

    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        _ => String::new(),
    };
    Some(text)
}

/// Escape text for use inside a single-quoted MySQL string literal
pub fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("''"),
            '\0' => escaped.push_str("\\0"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render a scalar as a quoted, escaped literal: `'value'`
pub fn quoted_literal(value: &Value) -> Option<String> {
    literal_text(value).map(|text| format!("'{}'", escape_literal(&text)))
}
