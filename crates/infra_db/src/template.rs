//! Statement-execution template
//!
//! [`SqlTemplate`] performs the acquire → bind → execute → map → release
//! sequence once, so repositories only supply SQL text, parameters and a row
//! mapper. Every call either borrows the connection of the unit of work it is
//! given or obtains its own from the configured provider, and releases what it
//! obtained before returning, on success and failure alike.

use std::fmt;
use std::sync::Arc;

use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use tracing::{debug, error};

use crate::connection::{ConnectionId, ConnectionProvider, Lease};
use crate::error::{DatabaseError, ErrorTranslator, SqliteCodeTranslator};
use crate::resources;
use crate::transaction::UnitOfWork;

/// A positional statement parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(i64::from(value))
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Text(value) => write!(f, "'{}'", value),
            SqlValue::Integer(value) => write!(f, "{}", value),
        }
    }
}

/// Executes parameterized statements on behalf of repositories
#[derive(Debug, Clone)]
pub struct SqlTemplate {
    provider: Arc<dyn ConnectionProvider>,
    translator: Arc<dyn ErrorTranslator>,
}

impl SqlTemplate {
    /// Creates a template that classifies failures by SQLite result code
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self {
            provider,
            translator: Arc::new(SqliteCodeTranslator),
        }
    }

    /// Replaces the failure translation strategy
    pub fn with_translator(mut self, translator: Arc<dyn ErrorTranslator>) -> Self {
        self.translator = translator;
        self
    }

    /// Returns the connection provider
    pub fn provider(&self) -> &Arc<dyn ConnectionProvider> {
        &self.provider
    }

    /// Executes a data-modifying statement
    ///
    /// # Arguments
    ///
    /// * `uow` - Unit of work whose connection to use, if any
    /// * `sql` - Statement with `?` placeholders
    /// * `params` - Values bound to the placeholders in order
    ///
    /// # Returns
    ///
    /// The number of rows affected
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ConnectionFailed` if no connection is available,
    /// otherwise the translated driver failure
    pub async fn update(
        &self,
        uow: Option<&mut UnitOfWork>,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<u64, DatabaseError> {
        let mut lease = self.acquire(uow).await?;

        let outcome = bind_params(sqlx::query(sql), params)
            .execute(&mut *lease)
            .await
            .map(|result| result.rows_affected());

        resources::release(lease).await;
        outcome.map_err(|e| self.translate(sql, params, e))
    }

    /// Executes a query and maps its first row, if any
    ///
    /// Only the first row is consumed; any further rows are discarded with
    /// the cursor.
    ///
    /// # Arguments
    ///
    /// * `uow` - Unit of work whose connection to use, if any
    /// * `sql` - Query with `?` placeholders
    /// * `params` - Values bound to the placeholders in order
    /// * `mapper` - Converts the row into the result type
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ConnectionFailed` if no connection is available,
    /// otherwise the translated driver or mapping failure
    pub async fn query_for_optional<T, F>(
        &self,
        uow: Option<&mut UnitOfWork>,
        sql: &str,
        params: &[SqlValue],
        mapper: F,
    ) -> Result<Option<T>, DatabaseError>
    where
        F: Fn(&SqliteRow) -> Result<T, sqlx::Error> + Send,
        T: Send,
    {
        let mut lease = self.acquire(uow).await?;

        let outcome = match bind_params(sqlx::query(sql), params)
            .fetch_optional(&mut *lease)
            .await
        {
            Ok(Some(row)) => mapper(&row).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };

        resources::release(lease).await;
        outcome.map_err(|e| self.translate(sql, params, e))
    }

    /// Reports which session a call with the same `uow` would run on
    ///
    /// Without a unit of work this obtains a connection like any other call
    /// and releases it again.
    pub async fn connection_id(&self, uow: Option<&mut UnitOfWork>) -> Result<ConnectionId, DatabaseError> {
        let mut lease = self.acquire(uow).await?;
        let id = lease.id().await;
        resources::release(lease).await;
        id
    }

    async fn acquire<'u>(&self, uow: Option<&'u mut UnitOfWork>) -> Result<Lease<'u>, DatabaseError> {
        let lease = match uow {
            Some(uow) => Lease::Borrowed(uow.connection()?),
            None => self.provider.get_connection().await?,
        };

        debug!(
            provider = self.provider.describe(),
            lease = lease.kind(),
            "get connection"
        );
        Ok(lease)
    }

    fn translate(&self, sql: &str, params: &[SqlValue], e: sqlx::Error) -> DatabaseError {
        let params = params.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        error!(sql, params = %params, error = %e, "db error");
        self.translator.translate(sql, e)
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Text(value) => query.bind(value.as_str()),
            SqlValue::Integer(value) => query.bind(*value),
        };
    }
    query
}
