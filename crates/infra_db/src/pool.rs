//! Database configuration and connection pool management
//!
//! This module provides the connection settings shared by every connection
//! provider, and creates the bounded SQLite pool used by the pooled provider.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::DatabaseError;

/// Type alias for the SQLite connection pool
pub type DatabasePool = SqlitePool;

/// Configuration options for database connections and the connection pool
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use infra_db::DatabaseConfig;
///
/// let config = DatabaseConfig::new("sqlite://members.db")
///     .credentials("sa", "")
///     .max_connections(10)
///     .connect_timeout(Duration::from_secs(10));
/// assert_eq!(config.max_connections, 10);
/// ```
#[derive(Clone)]
pub struct DatabaseConfig {
    /// SQLite connection string (e.g., "sqlite://members.db" or "sqlite::memory:")
    pub url: String,
    /// Database user, if the deployment supplies one
    pub username: Option<String>,
    /// Database password, if the deployment supplies one
    pub password: Option<String>,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// How long to wait for a connection, from the driver or from the pool
    pub connect_timeout: Duration,
    /// Maximum lifetime of a pooled connection
    pub max_lifetime: Duration,
    /// Idle timeout before closing a pooled connection
    pub idle_timeout: Duration,
    /// How long a statement waits on a locked database before failing
    pub busy_timeout: Duration,
}

impl DatabaseConfig {
    /// Creates a new database configuration with the given connection URL
    ///
    /// # Arguments
    ///
    /// * `url` - SQLite connection string
    ///
    /// # Returns
    ///
    /// A new `DatabaseConfig` with a pool of at most 10 connections
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            max_connections: 10,
            min_connections: 0,
            connect_timeout: Duration::from_secs(30),
            max_lifetime: Duration::from_secs(30 * 60), // 30 minutes
            idle_timeout: Duration::from_secs(10 * 60), // 10 minutes
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Sets the username and password supplied by the environment
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the maximum number of connections in the pool
    ///
    /// # Arguments
    ///
    /// * `max` - Maximum connection count (default: 10)
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections to maintain
    ///
    /// # Arguments
    ///
    /// * `min` - Minimum connection count (default: 0)
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout duration
    ///
    /// # Arguments
    ///
    /// * `timeout` - Duration to wait for a connection (default: 30s)
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the maximum lifetime of a connection
    ///
    /// # Arguments
    ///
    /// * `lifetime` - Maximum duration a connection can live (default: 30 min)
    pub fn max_lifetime(mut self, lifetime: Duration) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    /// Sets the idle timeout before closing a connection
    ///
    /// # Arguments
    ///
    /// * `timeout` - Duration of inactivity before closing (default: 10 min)
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Sets how long a statement waits on a locked database
    ///
    /// # Arguments
    ///
    /// * `timeout` - Busy wait limit (default: 5s)
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Builds the driver options every provider connects with
    ///
    /// SQLite has no authentication, so credentials are not part of the
    /// options; their presence is only logged.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Configuration` if the URL cannot be parsed
    pub fn connect_options(&self) -> Result<SqliteConnectOptions, DatabaseError> {
        if !self.url.starts_with("sqlite:") {
            return Err(DatabaseError::Configuration(format!(
                "unsupported database url '{}': expected a sqlite: url",
                self.url
            )));
        }

        let options = SqliteConnectOptions::from_str(&self.url)
            .map_err(|e| DatabaseError::Configuration(format!("invalid database url '{}': {}", self.url, e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(self.busy_timeout);

        if self.username.is_some() {
            debug!(
                username = self.username.as_deref().unwrap_or_default(),
                "sqlite driver ignores credentials"
            );
        }

        Ok(options)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new("sqlite://members.db")
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_lifetime", &self.max_lifetime)
            .field("idle_timeout", &self.idle_timeout)
            .field("busy_timeout", &self.busy_timeout)
            .finish()
    }
}

/// Creates a database connection pool with the given configuration
///
/// The pool hands out at most `max_connections` connections; callers beyond
/// that wait up to `connect_timeout` for one to be returned.
///
/// # Arguments
///
/// * `config` - Database configuration options
///
/// # Errors
///
/// Returns `DatabaseError::Configuration` for an unparseable URL and
/// `DatabaseError::ConnectionFailed` if the pool cannot be created
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::{DatabaseConfig, create_pool};
///
/// let config = DatabaseConfig::new("sqlite://members.db");
/// let pool = create_pool(&config).await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!(
        "Creating database pool with max_connections={}, min_connections={}",
        config.max_connections, config.min_connections
    );

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect_with(config.connect_options()?)
        .await
        .map_err(|e| DatabaseError::connection("failed to create connection pool", e))?;

    info!("Database pool created successfully");
    Ok(pool)
}

/// Creates a connection pool from a URL string with default settings
///
/// # Arguments
///
/// * `url` - SQLite connection string
pub async fn create_pool_from_url(url: &str) -> Result<DatabasePool, DatabaseError> {
    create_pool(&DatabaseConfig::new(url)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = DatabaseConfig::new("sqlite://test.db")
            .max_connections(50)
            .min_connections(10)
            .connect_timeout(Duration::from_secs(60));

        assert_eq!(config.max_connections, 50);
        assert_eq!(config.min_connections, 10);
        assert_eq!(config.connect_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_default_pool_size_is_ten() {
        assert_eq!(DatabaseConfig::default().max_connections, 10);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = DatabaseConfig::new("sqlite://test.db").credentials("sa", "hunter2");
        let debug = format!("{:?}", config);

        assert!(debug.contains("sa"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_connect_options_rejects_foreign_scheme() {
        let config = DatabaseConfig::new("postgres://localhost/members");
        let err = config.connect_options().unwrap_err();

        assert!(matches!(err, DatabaseError::Configuration(_)));
    }
}
