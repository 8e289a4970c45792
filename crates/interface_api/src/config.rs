//! API configuration
//!
//! Values come from built-in defaults, overridden by `API_`-prefixed
//! environment variables (e.g. `API_PORT=9090`). The server binary loads a
//! `.env` file into the environment first.

use std::fmt;

use config::{Config, ConfigError, Environment};
use infra_db::DatabaseConfig;
use serde::Deserialize;

/// API configuration
#[derive(Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Database user
    #[serde(default)]
    pub database_username: Option<String>,
    /// Database password
    #[serde(default)]
    pub database_password: Option<String>,
    /// Maximum number of pooled database connections
    pub database_max_connections: u32,
    /// Log level
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "sqlite://members.db".to_string(),
            database_username: None,
            database_password: None,
            database_max_connections: 10,
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::with_prefix("API"))
    }

    /// Loads configuration from defaults and the given environment source
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_url", defaults.database_url)?
            .set_default("database_max_connections", i64::from(defaults.database_max_connections))?
            .set_default("log_level", defaults.log_level)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the settings the connection pool is created with
    pub fn database_config(&self) -> DatabaseConfig {
        let config =
            DatabaseConfig::new(self.database_url.as_str()).max_connections(self.database_max_connections);

        match &self.database_username {
            Some(username) => config.credentials(
                username.as_str(),
                self.database_password.clone().unwrap_or_default(),
            ),
            None => config,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("database_username", &self.database_username)
            .field("database_password", &self.database_password.as_ref().map(|_| "<redacted>"))
            .field("database_max_connections", &self.database_max_connections)
            .field("log_level", &self.log_level)
            .finish()
    }
}
