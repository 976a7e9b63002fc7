//! Convenience re-exports for common query-engine usage

// Session
pub use crate::connection::{Connection, ExecuteResult, MySqlConnector, Transaction};

// Error types
pub use crate::errors::QueryError;

// Query building
pub use crate::query_builder::{
    ComparisonOperator, JoinType, Limit, Pagination, PatternKind, Predicate, SelectQuery,
    SortOrder,
};

// Execution
pub use crate::executor::{ExecuteOptions, Lines, QueryExecutor, QueryOutput, RowStream};

// Record operations
pub use crate::record::{PreparedStatement, RecordStore};

// Validation
pub use crate::validation::{ValidatedFieldName, ValidatedTableName, ValidationError};

// Common external dependencies that are frequently used
pub use futures::{StreamExt, TryStreamExt};
pub use serde_json::{json, Value};
pub use type_mapping::Row;
