//! Executor result shapes

use crate::query_builder::Pagination;
use crate::executor::ExecuteOptions;
use serde::Serialize;
use serde_json::Value;
use type_mapping::Row;

/// What an executed SELECT hands back, depending on [`ExecuteOptions`]
///
/// Serializes untagged: rows as a JSON array, a single row as an object,
/// envelopes as `{"data": ...}` and pages with the pagination field set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    Rows(Vec<Row>),
    Row(Row),
    Envelope { data: Vec<Row> },
    EnvelopeRow { data: Row },
    Page(Pagination),
}

impl QueryOutput {
    pub(crate) fn shape(rows: Vec<Row>, options: &ExecuteOptions) -> Self {
        let mut rows = rows;
        if rows.is_empty() {
            return QueryOutput::Rows(rows);
        }

        match (options.envelope, options.first) {
            (true, true) => QueryOutput::EnvelopeRow {
                data: rows.swap_remove(0),
            },
            (true, false) => QueryOutput::Envelope { data: rows },
            (false, true) => QueryOutput::Row(rows.swap_remove(0)),
            (false, false) => QueryOutput::Rows(rows),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            QueryOutput::Rows(rows) | QueryOutput::Envelope { data: rows } => rows.is_empty(),
            QueryOutput::Row(_) | QueryOutput::EnvelopeRow { .. } => false,
            QueryOutput::Page(page) => page.data().is_empty(),
        }
    }

    /// Flatten any shape into its rows
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            QueryOutput::Rows(rows) | QueryOutput::Envelope { data: rows } => rows,
            QueryOutput::Row(row) | QueryOutput::EnvelopeRow { data: row } => vec![row],
            QueryOutput::Page(page) => page.into_data(),
        }
    }

    pub fn as_page(&self) -> Option<&Pagination> {
        match self {
            QueryOutput::Page(page) => Some(page),
            _ => None,
        }
    }
}

/// Read from a stored result.
///
/// Without a key the whole buffer comes back. With a key, the value under it
/// (objects by name, arrays by index). With `current` as well, the first
/// element of the list (or first value of the object) under that key.
pub(crate) fn lookup(buffer: &Value, current: bool, key: Option<&str>) -> Option<Value> {
    let Some(key) = key else {
        return Some(buffer.clone());
    };

    let entry = match buffer {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }?;

    if !current {
        return Some(entry.clone());
    }

    match entry {
        Value::Array(items) => items.first().cloned(),
        Value::Object(map) => map.values().next().cloned(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::mock::row;
    use serde_json::json;

    fn sample() -> Vec<Row> {
        vec![
            row([("id", json!(1)), ("name", json!("Ann"))]),
            row([("id", json!(2)), ("name", json!("Bob"))]),
        ]
    }

    #[test]
    fn test_shapes() {
        let enveloped = QueryOutput::shape(sample(), &ExecuteOptions::new());
        assert_eq!(
            serde_json::to_value(&enveloped).unwrap(),
            json!({"data": [{"id": 1, "name": "Ann"}, {"id": 2, "name": "Bob"}]})
        );

        let first = QueryOutput::shape(sample(), &ExecuteOptions::new().first());
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            json!({"data": {"id": 1, "name": "Ann"}})
        );

        let raw_first = QueryOutput::shape(sample(), &ExecuteOptions::new().first().raw());
        assert_eq!(
            serde_json::to_value(&raw_first).unwrap(),
            json!({"id": 1, "name": "Ann"})
        );

        let raw = QueryOutput::shape(sample(), &ExecuteOptions::new().raw());
        assert_eq!(raw.into_rows().len(), 2);
    }

    #[test]
    fn test_no_rows_is_always_an_empty_list() {
        for options in [
            ExecuteOptions::new(),
            ExecuteOptions::new().first(),
            ExecuteOptions::new().raw().first(),
        ] {
            let output = QueryOutput::shape(Vec::new(), &options);
            assert_eq!(output, QueryOutput::Rows(Vec::new()));
            assert_eq!(serde_json::to_value(&output).unwrap(), json!([]));
        }
    }

    #[test]
    fn test_lookup_modes() {
        let buffer = json!({"data": [{"id": 1}, {"id": 2}], "meta": {"page": 3, "of": 9}});

        assert_eq!(lookup(&buffer, false, None), Some(buffer.clone()));
        assert_eq!(
            lookup(&buffer, false, Some("data")),
            Some(json!([{"id": 1}, {"id": 2}]))
        );
        assert_eq!(lookup(&buffer, true, Some("data")), Some(json!({"id": 1})));
        assert_eq!(lookup(&buffer, true, Some("meta")), Some(json!(3)));
        assert_eq!(lookup(&buffer, false, Some("missing")), None);
    }

    #[test]
    fn test_lookup_on_row_list() {
        let buffer = json!([{"id": 1}, {"id": 2}]);

        assert_eq!(lookup(&buffer, false, Some("1")), Some(json!({"id": 2})));
        assert_eq!(lookup(&buffer, true, Some("0")), Some(json!(1)));
        assert_eq!(lookup(&buffer, false, Some("data")), None);
    }
}
