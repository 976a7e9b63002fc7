//! Database session abstraction
//!
//! A [`Connection`] is one logical session. Everything that depends on
//! session state (`FOUND_ROWS()`, `LAST_INSERT_ID()`, open transactions)
//! goes through the same value, so callers either own a connection or lend
//! it out as `&mut C`.

pub mod mysql;
pub mod transaction;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;
use type_mapping::Row;

pub use mysql::MySqlConnector;
pub use transaction::Transaction;

/// Outcome of a statement that does not return rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteResult {
    pub rows_affected: u64,
    pub last_insert_id: u64,
}

/// Lazily decoded rows of an open statement
pub type RowCursor<'c> = BoxStream<'c, Result<Row, sqlx::Error>>;

#[async_trait]
pub trait Connection: Send {
    /// Prepare and run a statement with positional `?` parameters
    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecuteResult, sqlx::Error>;

    async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, sqlx::Error>;

    async fn fetch_optional(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<Row>, sqlx::Error> {
        Ok(self.fetch_all(sql, params).await?.into_iter().next())
    }

    /// Open a cursor; the session stays borrowed until the stream is dropped
    async fn fetch<'c>(&'c mut self, sql: &'c str) -> Result<RowCursor<'c>, sqlx::Error>;

    /// Value of `FOUND_ROWS()` for the previous statement, if the backend has one
    async fn found_rows(&mut self) -> Result<Option<u64>, sqlx::Error>;

    async fn begin(&mut self) -> Result<(), sqlx::Error>;

    async fn commit(&mut self) -> Result<(), sqlx::Error>;

    async fn rollback(&mut self) -> Result<(), sqlx::Error>;

    /// Id generated by the last successful insert on this session
    fn last_insert_id(&self) -> Option<u64>;
}

#[async_trait]
impl<C: Connection + ?Sized> Connection for &mut C {
    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecuteResult, sqlx::Error> {
        (**self).execute(sql, params).await
    }

    async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, sqlx::Error> {
        (**self).fetch_all(sql, params).await
    }

    async fn fetch_optional(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<Row>, sqlx::Error> {
        (**self).fetch_optional(sql, params).await
    }

    async fn fetch<'c>(&'c mut self, sql: &'c str) -> Result<RowCursor<'c>, sqlx::Error> {
        (**self).fetch(sql).await
    }

    async fn found_rows(&mut self) -> Result<Option<u64>, sqlx::Error> {
        (**self).found_rows().await
    }

    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        (**self).begin().await
    }

    async fn commit(&mut self) -> Result<(), sqlx::Error> {
        (**self).commit().await
    }

    async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        (**self).rollback().await
    }

    fn last_insert_id(&self) -> Option<u64> {
        (**self).last_insert_id()
    }
}
