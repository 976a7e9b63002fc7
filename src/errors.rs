//! Error types for the querykit crate
//!
//! This module contains the facade error that wraps failures from the
//! config and query-engine crates.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryKitError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Query error: {0}")]
    Query(#[from] query_engine::QueryError),
}
