//! Query execution
//!
//! [`QueryExecutor`] runs [`SelectQuery`] values over a [`Connection`] and
//! shapes the rows into the form the caller asked for: bare rows, a
//! `{"data": ...}` envelope, a single row, or a computed page.

mod options;
mod output;
mod stream;

#[cfg(test)]
mod tests;

pub use options::ExecuteOptions;
pub use output::QueryOutput;
pub use stream::{Lines, RowStream};

use crate::connection::Connection;
use crate::errors::QueryError;
use crate::query_builder::{Limit, Pagination, SelectQuery};
use config::{CountStrategy, FailurePolicy, QueryConfig};
use serde_json::Value;
use type_mapping::Row;

pub struct QueryExecutor<C: Connection> {
    conn: C,
    config: QueryConfig,
    statement: String,
    last_result: Option<Value>,
    rows_affected: Option<u64>,
}

impl<C: Connection> std::fmt::Debug for QueryExecutor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("config", &self.config)
            .field("statement", &self.statement)
            .field("rows_affected", &self.rows_affected)
            .finish()
    }
}

fn ensure_table(query: &SelectQuery) -> Result<(), QueryError> {
    match query.table() {
        Some(_) => Ok(()),
        None => Err(QueryError::MissingTable),
    }
}

fn scalar_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn first_scalar(rows: &[Row]) -> Option<i64> {
    rows.first()
        .and_then(|row| row.values().next())
        .and_then(scalar_as_i64)
}

impl<C: Connection> QueryExecutor<C> {
    pub fn new(conn: C) -> Self {
        Self::with_config(conn, QueryConfig::default())
    }

    pub fn with_config(conn: C, config: QueryConfig) -> Self {
        Self {
            conn,
            config,
            statement: String::new(),
            last_result: None,
            rows_affected: None,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    pub fn into_inner(self) -> C {
        self.conn
    }

    /// The most recently executed SQL text
    pub fn last_statement(&self) -> &str {
        &self.statement
    }

    /// Row count captured by the last `execute` with `count_rows`.
    ///
    /// Streams keep their own count, see [`RowStream::row_count`].
    pub fn rows_affected(&self) -> Option<u64> {
        self.rows_affected
    }

    /// The last stored result as JSON
    pub fn last_result(&self) -> Option<&Value> {
        self.last_result.as_ref()
    }

    /// Read from the last stored result; see [`QueryOutput`] for its JSON shape.
    ///
    /// No key returns the whole buffer, a key returns the value under it,
    /// and `current` narrows that to its first element.
    pub fn get_data(&self, current: bool, key: Option<&str>) -> Option<Value> {
        self.last_result
            .as_ref()
            .and_then(|buffer| output::lookup(buffer, current, key))
    }

    /// Execute a SELECT and shape its rows
    pub async fn execute(
        &mut self,
        query: &SelectQuery,
        options: ExecuteOptions,
    ) -> Result<QueryOutput, QueryError> {
        ensure_table(query)?;

        let result = if options.paginate {
            self.page(query).await.map(QueryOutput::Page)
        } else {
            self.fetch_rows(&query.to_sql()).await.map(|rows| {
                if options.count_rows {
                    self.rows_affected = Some(rows.len() as u64);
                }
                QueryOutput::shape(rows, &options)
            })
        };

        match result {
            Ok(output) => {
                self.last_result = Some(serde_json::to_value(&output)?);
                Ok(output)
            }
            Err(e) => self.recover(e, &options),
        }
    }

    /// Execute a SELECT and hand back its rows as they arrive.
    ///
    /// With `paginate` the page is computed eagerly and returned whole.
    /// With `count_rows` the count lives on the stream
    /// ([`RowStream::row_count`], rows yielded so far); the executor's
    /// [`rows_affected`](Self::rows_affected) is left untouched.
    pub async fn stream_rows(
        &mut self,
        query: &SelectQuery,
        count_rows: bool,
        paginate: bool,
    ) -> Result<Lines<'_>, QueryError> {
        ensure_table(query)?;

        if paginate {
            let page = self.page(query).await?;
            self.last_result = Some(serde_json::to_value(&page)?);
            return Ok(Lines::Page(page));
        }

        self.statement = query.to_sql();
        crate::debug_log!("[STREAM] SQL: {}", self.statement);

        let Self {
            conn, statement, ..
        } = self;
        let sql = statement.as_str();

        match conn.fetch(sql).await {
            Ok(rows) => Ok(Lines::Stream(RowStream::new(rows, sql, count_rows))),
            Err(e) => {
                tracing::error!(sql = %sql, error = %e, "query failed");
                Err(QueryError::query_execution(sql, e))
            }
        }
    }

    /// `SELECT COUNT(field)` over the query's source and filters
    pub async fn count(&mut self, query: &SelectQuery, field: &str) -> Result<Option<i64>, QueryError> {
        ensure_table(query)?;

        let rows = self.fetch_rows(&query.count_sql(field)).await?;
        let total = first_scalar(&rows);
        self.last_result = Some(serde_json::to_value(&rows)?);
        Ok(total)
    }

    async fn fetch_rows(&mut self, sql: &str) -> Result<Vec<Row>, QueryError> {
        self.statement = sql.to_string();
        crate::debug_log!("[SELECT] SQL: {}", sql);

        self.conn.fetch_all(sql, &[]).await.map_err(|e| {
            tracing::error!(sql = %sql, error = %e, "query failed");
            QueryError::query_execution(sql, e)
        })
    }

    /// Two-phase page query: total first, then the rows of the clamped page
    async fn page(&mut self, query: &SelectQuery) -> Result<Pagination, QueryError> {
        let Some(limit) = query.current_limit() else {
            tracing::debug!("[PAGINATE] no limit set, returning empty page");
            return Ok(Pagination::empty(self.config.default_page_size));
        };

        let (current_page, page_size) = limit.as_page();
        Pagination::ensure_page_size(page_size)?;

        let total = self.total_rows(query).await?;
        let mut pagination = Pagination::new(total, current_page, page_size);
        pagination.calculate()?;
        tracing::debug!(
            "[PAGINATE] total: {}, page {}/{}, limit {}",
            total,
            pagination.current_page(),
            pagination.pages(),
            pagination.limit_fragment()
        );

        let mut page_query = query.clone();
        page_query.limit = Some(Limit::new(pagination.limit_pages(), pagination.offset()));
        let rows = self.fetch_rows(&page_query.to_sql()).await?;
        pagination.set_data(rows);

        Ok(pagination)
    }

    async fn total_rows(&mut self, query: &SelectQuery) -> Result<u64, QueryError> {
        if self.config.count_strategy == CountStrategy::FoundRows {
            let counted = query.clone().set_pagination(true);
            self.fetch_rows(&counted.to_sql()).await?;

            match self.conn.found_rows().await {
                Ok(Some(total)) => return Ok(total),
                Ok(None) => tracing::debug!("[PAGINATE] FOUND_ROWS() unavailable, counting instead"),
                Err(e) => {
                    tracing::error!(sql = "SELECT FOUND_ROWS()", error = %e, "query failed");
                    return Err(QueryError::query_execution("SELECT FOUND_ROWS()", e));
                }
            }
        }

        let rows = self.fetch_rows(&query.total_sql()).await?;
        Ok(first_scalar(&rows)
            .and_then(|total| u64::try_from(total).ok())
            .unwrap_or(0))
    }

    fn recover(&mut self, error: QueryError, options: &ExecuteOptions) -> Result<QueryOutput, QueryError> {
        if self.config.on_failure == FailurePolicy::Recover && error.is_driver_failure() {
            tracing::warn!("returning empty result after failure: {}", error);
            let output = if options.paginate {
                QueryOutput::Page(Pagination::empty(self.config.default_page_size))
            } else {
                QueryOutput::Rows(Vec::new())
            };
            self.last_result = Some(serde_json::to_value(&output)?);
            return Ok(output);
        }
        Err(error)
    }
}
