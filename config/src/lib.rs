//! # Configuration Management for querykit
//!
//! This crate provides the configuration structures shared by the querykit
//! crates: database connection settings and query execution behavior.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{DatabaseConfig, QueryConfig};
//!
//! let db_config = DatabaseConfig::new(
//!     "localhost".to_string(), 3306, "myapp".to_string(),
//!     "root".to_string(), "password".to_string(),
//!     1, 10, 30, 600, 3600,
//! );
//!
//! let query_config = QueryConfig::default();
//! assert_eq!(query_config.default_page_size, 10);
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! host = "localhost"
//! port = 3306
//! database = "myapp"
//! username = "root"
//! password = "password"
//! charset = "utf8mb4"
//! min_connections = 1
//! max_connections = 10
//! connection_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//!
//! [query]
//! default_page_size = 10
//! count_strategy = "found_rows"
//! on_failure = "propagate"
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from querykit.toml (or the path in QUERYKIT_CONFIG)
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./querykit.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_charset")]
    pub charset: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

/// How the total row count is obtained when a query is paginated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountStrategy {
    /// `SQL_CALC_FOUND_ROWS` on the first query, then `SELECT FOUND_ROWS()`
    #[default]
    FoundRows,
    /// A separate `SELECT COUNT(*)` over the same rows the query yields
    CountQuery,
}

/// What read paths do with a driver failure once it has been logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return the error to the caller
    #[default]
    Propagate,
    /// Return an empty result instead
    Recover,
}

/// Query execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default)]
    pub count_strategy: CountStrategy,
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

fn default_charset() -> String {
    "utf8mb4".to_string()
}

fn default_page_size() -> u64 {
    10
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            count_strategy: CountStrategy::default(),
            on_failure: FailurePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file specified in .env or defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = {
            // A missing .env file is fine, the variable may come from the environment
            if let Err(e) = dotenvy::dotenv() {
                if !e.not_found() {
                    return Err(e.into());
                }
            }

            if let Ok(config_path) = env::var("QUERYKIT_CONFIG") {
                Self::from_file(&config_path)
            } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
                Self::from_file(DEFAULT_CONFIG_PATH)
            } else {
                Err(ConfigError::Invalid(format!(
                    "Config path must be specified in .env file as QUERYKIT_CONFIG or in {} file",
                    DEFAULT_CONFIG_PATH
                )))
            }
        }?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.query.validate()
    }
}

impl QueryConfig {
    pub fn new(
        default_page_size: u64,
        count_strategy: CountStrategy,
        on_failure: FailurePolicy,
    ) -> Self {
        Self {
            default_page_size,
            count_strategy,
            on_failure,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::Invalid(
                "Query default_page_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
        min_connections: u32,
        max_connections: u32,
        connection_timeout_seconds: u64,
        idle_timeout_seconds: u64,
        max_lifetime_seconds: u64,
    ) -> Self {
        Self {
            host,
            port,
            database,
            username,
            password,
            charset: default_charset(),
            min_connections,
            max_connections,
            connection_timeout_seconds,
            idle_timeout_seconds,
            max_lifetime_seconds,
        }
    }

    /// Read connection settings from `DB_*` environment variables (after loading `.env`).
    ///
    /// `DB_HOST`, `DB_DATABASE` and `DB_USERNAME` are required. `DB_PORT` defaults to
    /// 3306, `DB_PASSWORD` to empty and `DB_CHARSET` to utf8mb4. Pool sizing uses
    /// fixed defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e.into());
            }
        }

        let port = match env::var("DB_PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid(format!("DB_PORT is not a valid port: {}", port)))?,
            Err(env::VarError::NotPresent) => 3306,
            Err(e) => return Err(e.into()),
        };

        let mut config = Self::new(
            env::var("DB_HOST")?,
            port,
            env::var("DB_DATABASE")?,
            env::var("DB_USERNAME")?,
            env::var("DB_PASSWORD").unwrap_or_default(),
            1,
            5,
            30,
            600,
            3600,
        );
        if let Ok(charset) = env::var("DB_CHARSET") {
            config.charset = charset;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the connection character set
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Build connection string
    pub fn connection_string(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Database host cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(
                "Database port cannot be zero".to_string(),
            ));
        }
        if self.database.is_empty() {
            return Err(ConfigError::Invalid(
                "Database name cannot be empty".to_string(),
            ));
        }
        if self.username.is_empty() {
            return Err(ConfigError::Invalid(
                "Database username cannot be empty".to_string(),
            ));
        }
        if self.charset.is_empty() {
            return Err(ConfigError::Invalid(
                "Database charset cannot be empty".to_string(),
            ));
        }
        if self.min_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database min_connections must be greater than 0".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid(
                "Database min_connections cannot be greater than max_connections".to_string(),
            ));
        }
        if self.connection_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connection_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
