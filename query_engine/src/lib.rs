//! Query Engine - SELECT building, execution and record operations for querykit
//!
//! This crate provides the session abstraction, the fluent query builder,
//! the executor with pagination, and single-table record operations.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod connection;
pub mod errors;
pub mod executor;
pub mod prelude;
pub mod query_builder;
pub mod record;
pub mod validation;

pub use connection::{Connection, ExecuteResult, MySqlConnector, Transaction};
pub use errors::QueryError;
pub use executor::{ExecuteOptions, Lines, QueryExecutor, QueryOutput, RowStream};
pub use query_builder::{ComparisonOperator, Pagination, SelectQuery, SortOrder};
pub use record::{PreparedStatement, RecordStore};
pub use type_mapping::Row;
pub use validation::{ValidatedFieldName, ValidatedTableName, ValidationError};
