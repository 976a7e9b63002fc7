//! Convenience re-exports for common querykit usage
//!
//! # Example
//!
//! ```rust
//! use querykit::prelude::*;
//!
//! let query = SelectQuery::new().from("users", "u").limit(10, 0);
//! assert_eq!(query.to_sql(), "SELECT * FROM users AS u LIMIT 0,10");
//! ```

// Core querykit components
pub use crate::core::QueryKit;
pub use crate::errors::QueryKitError;

// Re-export centralized config
pub use config::{AppConfig, CountStrategy, DatabaseConfig, FailurePolicy, QueryConfig};

// Re-export commonly used query-engine types for convenience
pub use query_engine::prelude::*;

// Common external dependencies
pub use async_trait;
pub use sqlx;
pub use tokio;
