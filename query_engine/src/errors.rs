use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Query execution failed for `{sql}`: {source}")]
    QueryExecution {
        sql: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),

    #[error("Alias required for qualified column `{0}`: call from() with an alias first")]
    MissingAlias(String),

    #[error("No table selected: call from() before executing the query")]
    MissingTable,

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QueryError {
    pub fn query_execution(sql: impl Into<String>, source: sqlx::Error) -> Self {
        Self::QueryExecution {
            sql: sql.into(),
            source,
        }
    }

    pub fn invalid_predicate(message: impl Into<String>) -> Self {
        Self::InvalidPredicate(message.into())
    }

    /// True for failures raised by the driver rather than by query construction
    pub fn is_driver_failure(&self) -> bool {
        matches!(self, Self::Database(_) | Self::QueryExecution { .. })
    }
}
