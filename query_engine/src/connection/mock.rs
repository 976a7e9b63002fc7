//! In-memory connection for unit tests

use crate::connection::{Connection, ExecuteResult, RowCursor};
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use type_mapping::Row;

type Handler = Box<dyn FnMut(&str) -> Result<Vec<Row>, sqlx::Error> + Send>;

/// Records every statement and answers from a handler closure
pub(crate) struct MockConnection {
    pub statements: Vec<String>,
    pub params: Vec<Vec<Value>>,
    pub found_rows: Option<u64>,
    pub rows_affected: u64,
    pub next_insert_id: u64,
    handler: Handler,
    last_insert_id: Option<u64>,
}

impl MockConnection {
    pub fn new(handler: impl FnMut(&str) -> Result<Vec<Row>, sqlx::Error> + Send + 'static) -> Self {
        Self {
            statements: Vec::new(),
            params: Vec::new(),
            found_rows: None,
            rows_affected: 1,
            next_insert_id: 1,
            handler: Box::new(handler),
            last_insert_id: None,
        }
    }

    /// Every statement returns the same rows
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self::new(move |_| Ok(rows.clone()))
    }

    /// Every statement fails at the driver
    pub fn failing() -> Self {
        Self::new(|_| Err(sqlx::Error::Protocol("connection reset".to_string())))
    }

    fn respond(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, sqlx::Error> {
        self.statements.push(sql.to_string());
        self.params.push(params.to_vec());
        (self.handler)(sql)
    }
}

/// Build a row from `(column, value)` pairs
pub(crate) fn row<const N: usize>(pairs: [(&str, Value); N]) -> Row {
    pairs
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}

#[async_trait]
impl Connection for MockConnection {
    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecuteResult, sqlx::Error> {
        self.respond(sql, params)?;
        let result = ExecuteResult {
            rows_affected: self.rows_affected,
            last_insert_id: self.next_insert_id,
        };
        if sql.starts_with("INSERT") {
            self.last_insert_id = Some(self.next_insert_id);
            self.next_insert_id += 1;
        }
        Ok(result)
    }

    async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, sqlx::Error> {
        self.respond(sql, params)
    }

    async fn fetch<'c>(&'c mut self, sql: &'c str) -> Result<RowCursor<'c>, sqlx::Error> {
        let rows = self.respond(sql, &[])?;
        Ok(futures::stream::iter(rows.into_iter().map(Ok)).boxed())
    }

    async fn found_rows(&mut self) -> Result<Option<u64>, sqlx::Error> {
        self.statements.push("SELECT FOUND_ROWS()".to_string());
        Ok(self.found_rows)
    }

    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        self.respond("START TRANSACTION", &[]).map(|_| ())
    }

    async fn commit(&mut self) -> Result<(), sqlx::Error> {
        self.respond("COMMIT", &[]).map(|_| ())
    }

    async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        self.respond("ROLLBACK", &[]).map(|_| ())
    }

    fn last_insert_id(&self) -> Option<u64> {
        self.last_insert_id
    }
}
