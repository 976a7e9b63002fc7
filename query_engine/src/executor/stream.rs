//! Incremental row delivery

use crate::connection::RowCursor;
use crate::errors::QueryError;
use crate::query_builder::Pagination;
use futures::{Stream, TryStreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use type_mapping::Row;

/// Rows of an open statement, decoded as they arrive.
///
/// Holds the executor's session until dropped; driver errors are logged with
/// the statement text and surfaced as [`QueryError::QueryExecution`].
pub struct RowStream<'a> {
    rows: RowCursor<'a>,
    sql: &'a str,
    count_rows: bool,
    yielded: u64,
}

impl<'a> RowStream<'a> {
    pub(crate) fn new(rows: RowCursor<'a>, sql: &'a str, count_rows: bool) -> Self {
        Self {
            rows,
            sql,
            count_rows,
            yielded: 0,
        }
    }

    pub fn sql(&self) -> &str {
        self.sql
    }

    /// Rows yielded so far, when counting was requested
    pub fn row_count(&self) -> Option<u64> {
        self.count_rows.then_some(self.yielded)
    }

    /// Drain the remaining rows
    pub async fn collect_rows(self) -> Result<Vec<Row>, QueryError> {
        self.try_collect().await
    }
}

impl Stream for RowStream<'_> {
    type Item = Result<Row, QueryError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.rows.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(row))) => {
                self.yielded += 1;
                crate::trace_log!("[STREAM] row {}", self.yielded);
                Poll::Ready(Some(Ok(row)))
            }
            Poll::Ready(Some(Err(e))) => {
                tracing::error!(sql = %self.sql, error = %e, "row stream failed");
                Poll::Ready(Some(Err(QueryError::query_execution(self.sql, e))))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Result of [`QueryExecutor::stream_rows`](crate::executor::QueryExecutor::stream_rows)
pub enum Lines<'a> {
    Stream(RowStream<'a>),
    Page(Pagination),
}

impl<'a> Lines<'a> {
    pub fn into_stream(self) -> Option<RowStream<'a>> {
        match self {
            Lines::Stream(stream) => Some(stream),
            Lines::Page(_) => None,
        }
    }

    pub fn into_page(self) -> Option<Pagination> {
        match self {
            Lines::Page(page) => Some(page),
            Lines::Stream(_) => None,
        }
    }
}
