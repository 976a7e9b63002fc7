//! MySQL session over a sqlx pool

use crate::connection::{Connection, ExecuteResult, RowCursor};
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use sqlx::mysql::MySqlPool;
use sqlx::pool::PoolConnection;
use sqlx::MySql;
use type_mapping::{bind_value, decode_row, Row};

const FOUND_ROWS_SQL: &str = "SELECT FOUND_ROWS()";

/// One pinned pooled connection, acquired on first use.
///
/// The session is kept between calls so that `FOUND_ROWS()`,
/// `LAST_INSERT_ID()` and transactions observe the statements that came
/// before them. An I/O failure drops the session; the next call acquires a
/// fresh one.
pub struct MySqlConnector {
    pool: MySqlPool,
    session: Option<PoolConnection<MySql>>,
    in_transaction: bool,
    last_insert_id: Option<u64>,
}

impl std::fmt::Debug for MySqlConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlConnector")
            .field("connected", &self.is_connected())
            .field("in_transaction", &self.in_transaction)
            .field("last_insert_id", &self.last_insert_id)
            .finish()
    }
}

impl MySqlConnector {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            session: None,
            in_transaction: false,
            last_insert_id: None,
        }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Return the session to the pool, rolling back an open transaction first
    pub async fn disconnect(&mut self) -> Result<(), sqlx::Error> {
        if self.in_transaction && self.session.is_some() {
            Connection::rollback(self).await?;
        }
        self.session = None;
        Ok(())
    }

    async fn session(&mut self) -> Result<&mut PoolConnection<MySql>, sqlx::Error> {
        if self.session.is_none() {
            tracing::debug!("[SESSION] acquiring pooled connection");
            self.session = Some(self.pool.acquire().await?);
        }
        self.session.as_mut().ok_or(sqlx::Error::PoolClosed)
    }

    fn observe<T>(&mut self, result: Result<T, sqlx::Error>) -> Result<T, sqlx::Error> {
        if let Err(sqlx::Error::Io(e)) = &result {
            tracing::warn!("[SESSION] dropping connection after I/O error: {}", e);
            self.session = None;
            self.in_transaction = false;
        }
        result
    }

    async fn run_control(&mut self, statement: &'static str) -> Result<(), sqlx::Error> {
        let conn = self.session().await?;
        // Plain &str executes over the text protocol; transaction control is
        // not allowed as a prepared statement.
        let result = sqlx::Executor::execute(&mut **conn, statement).await;
        self.observe(result).map(|_| ())
    }
}

#[async_trait]
impl Connection for MySqlConnector {
    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecuteResult, sqlx::Error> {
        let query = params
            .iter()
            .fold(sqlx::query(sql), |query, param| bind_value(query, param));

        let conn = self.session().await?;
        let result = query.execute(&mut **conn).await;
        let done = self.observe(result)?;

        self.last_insert_id = Some(done.last_insert_id());
        Ok(ExecuteResult {
            rows_affected: done.rows_affected(),
            last_insert_id: done.last_insert_id(),
        })
    }

    async fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, sqlx::Error> {
        let query = params
            .iter()
            .fold(sqlx::query(sql), |query, param| bind_value(query, param));

        let conn = self.session().await?;
        let result = query.fetch_all(&mut **conn).await;
        let rows = self.observe(result)?;

        rows.iter().map(decode_row).collect()
    }

    async fn fetch_optional(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<Row>, sqlx::Error> {
        let query = params
            .iter()
            .fold(sqlx::query(sql), |query, param| bind_value(query, param));

        let conn = self.session().await?;
        let result = query.fetch_optional(&mut **conn).await;
        let row = self.observe(result)?;

        row.as_ref().map(decode_row).transpose()
    }

    async fn fetch<'c>(&'c mut self, sql: &'c str) -> Result<RowCursor<'c>, sqlx::Error> {
        let conn = self.session().await?;
        let rows = sqlx::query(sql)
            .fetch(&mut **conn)
            .map(|row| row.and_then(|row| decode_row(&row)));
        Ok(rows.boxed())
    }

    async fn found_rows(&mut self) -> Result<Option<u64>, sqlx::Error> {
        let row = self.fetch_optional(FOUND_ROWS_SQL, &[]).await?;
        Ok(row
            .and_then(|row| row.into_iter().next())
            .and_then(|(_, value)| value.as_u64()))
    }

    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        self.run_control("START TRANSACTION").await?;
        self.in_transaction = true;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), sqlx::Error> {
        self.in_transaction = false;
        self.run_control("COMMIT").await
    }

    async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        self.in_transaction = false;
        self.run_control("ROLLBACK").await
    }

    fn last_insert_id(&self) -> Option<u64> {
        self.last_insert_id
    }
}

impl Drop for MySqlConnector {
    fn drop(&mut self) {
        if self.in_transaction {
            if let Some(conn) = self.session.take() {
                // Closing the socket makes the server roll back; returning it
                // to the pool would leak the open transaction.
                tracing::warn!("[SESSION] connector dropped inside a transaction, closing connection");
                drop(conn.detach());
            }
        }
    }
}
