//! Core querykit functionality
//!
//! This module contains the [`QueryKit`] coordinator: it owns the MySQL pool
//! and hands out connectors, executors and record stores bound to it.

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use crate::errors::QueryKitError;
use config::{AppConfig, DatabaseConfig, QueryConfig};
use query_engine::{MySqlConnector, QueryExecutor, RecordStore};

/// Main querykit coordinator that manages the database pool
#[derive(Debug, Clone)]
pub struct QueryKit {
    pool: MySqlPool,
    query_config: QueryConfig,
}

impl QueryKit {
    /// Create a new coordinator. The pool connects lazily, on first use.
    pub fn new(config: &DatabaseConfig, query_config: QueryConfig) -> Result<Self, QueryKitError> {
        config.validate()?;
        query_config.validate()?;

        let connect_options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.username)
            .password(&config.password)
            .charset(&config.charset);

        let mut pool_options = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect_lazy_with(connect_options);
        tracing::debug!(
            "querykit pool configured for {}:{}/{}",
            config.host,
            config.port,
            config.database
        );

        Ok(Self { pool, query_config })
    }

    /// Create a coordinator from a loaded application config
    pub fn from_config(config: &AppConfig) -> Result<Self, QueryKitError> {
        Self::new(&config.database, config.query.clone())
    }

    /// Load `querykit.toml` (or `QUERYKIT_CONFIG`) and build a coordinator
    pub fn from_default_config() -> Result<Self, QueryKitError> {
        Self::from_config(&AppConfig::load()?)
    }

    /// Get database pool reference
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub fn query_config(&self) -> &QueryConfig {
        &self.query_config
    }

    /// A new session over the pool
    pub fn connector(&self) -> MySqlConnector {
        MySqlConnector::new(self.pool.clone())
    }

    /// An executor on its own session, using the configured query behavior
    pub fn executor(&self) -> QueryExecutor<MySqlConnector> {
        QueryExecutor::with_config(self.connector(), self.query_config.clone())
    }

    /// Record operations for one table on their own session
    pub fn records(&self, table: &str) -> Result<RecordStore<MySqlConnector>, QueryKitError> {
        Ok(RecordStore::new(self.connector(), table)?)
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), QueryKitError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Close the pool; outstanding sessions are closed as they are returned
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
