//! # querykit
//!
//! A fluent MySQL SELECT builder with two-phase pagination, row streaming
//! and single-table record helpers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use querykit::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new(
//!         "localhost".to_string(), 3306, "shop".to_string(),
//!         "root".to_string(), "password".to_string(),
//!         1, 5, 30, 600, 3600,
//!     );
//!
//!     let querykit = QueryKit::new(&config, QueryConfig::default())?;
//!     querykit.health_check().await?;
//!
//!     let query = SelectQuery::new()
//!         .select(["u.id", "u.name"])
//!         .from("users", "u")
//!         .filter_qualified([("active", 1)], ComparisonOperator::Eq)?
//!         .order_by("u.name", SortOrder::Asc)
//!         .page(2, 20);
//!
//!     let mut executor = querykit.executor();
//!     let output = executor
//!         .execute(&query, ExecuteOptions::new().paginate())
//!         .await?;
//!     println!("{}", serde_json::to_string(&output)?);
//!
//!     let mut record = Row::new();
//!     record.insert("name".to_string(), json!("Ann"));
//!     let mut users = querykit.records("users")?;
//!     users.insert(&record).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::QueryKit;
pub use errors::QueryKitError;

// Re-export centralized config
pub use config::{AppConfig, CountStrategy, DatabaseConfig, FailurePolicy, QueryConfig};

// Re-export internal crates used by the public API
pub use query_engine;
pub use query_engine::{debug_log, trace_log};
pub use type_mapping;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
