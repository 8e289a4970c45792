//! Database Test Utilities
//!
//! Every [`TestDatabase`] is a fresh SQLite file in its own temporary
//! directory, migrated and ready to use. The directory is removed when the
//! value is dropped, so tests never share state.

use std::time::Duration;

use infra_db::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
use tempfile::TempDir;

/// Pool size used unless a test asks for another one
pub const DEFAULT_TEST_POOL_SIZE: u32 = 5;

const DATABASE_FILE: &str = "members.db";

/// A migrated SQLite database that lives as long as this value
pub struct TestDatabase {
    _dir: TempDir,
    pub config: DatabaseConfig,
    pub pool: DatabasePool,
}

impl TestDatabase {
    /// Creates a database with the default test pool size
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory, the pool or the schema
    /// cannot be created
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::with_config(|config| config).await
    }

    /// Creates a database whose pool holds at most `max` connections
    pub async fn with_max_connections(max: u32) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::with_config(|config| config.max_connections(max)).await
    }

    /// Creates a database after adjusting the default test configuration
    ///
    /// # Arguments
    ///
    /// * `configure` - Receives the default test configuration and returns
    ///   the one to use
    pub async fn with_config(
        configure: impl FnOnce(DatabaseConfig) -> DatabaseConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let dir = tempfile::tempdir()?;
        let url = format!("sqlite://{}", dir.path().join(DATABASE_FILE).display());

        let config = configure(
            DatabaseConfig::new(url)
                .max_connections(DEFAULT_TEST_POOL_SIZE)
                .connect_timeout(Duration::from_secs(5)),
        );

        let pool = create_pool(&config).await?;
        run_migrations(&pool).await?;

        Ok(Self {
            _dir: dir,
            config,
            pool,
        })
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Returns the configuration the pool was created with
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Removes every member row while keeping the schema
    pub async fn clear_data(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("DELETE FROM member").execute(&self.pool).await?;
        Ok(())
    }

    /// Counts the member rows currently stored
    pub async fn member_count(&self) -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
