//! Connection providers
//!
//! A provider hands out a live connection per call, either by opening a new
//! physical connection every time or by drawing one from a bounded pool.
//! What the caller receives is a [`Lease`], which remembers how the
//! connection was obtained so that [`crate::resources::release`] can give it
//! back the right way.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Sqlite};
use tracing::debug;

use crate::error::DatabaseError;
use crate::pool::{DatabaseConfig, DatabasePool};

/// Supplies live database connections
#[async_trait]
pub trait ConnectionProvider: Send + Sync + fmt::Debug {
    /// Obtains a connection
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ConnectionFailed` if no connection can be
    /// produced within the provider's timeout
    async fn get_connection(&self) -> Result<Lease<'static>, DatabaseError>;

    /// Short label used in logs
    fn describe(&self) -> &'static str;
}

/// Opens a new physical connection on every call
#[derive(Debug, Clone)]
pub struct DirectConnectionProvider {
    options: SqliteConnectOptions,
    connect_timeout: Duration,
}

impl DirectConnectionProvider {
    /// Creates a provider from explicit driver options
    pub fn new(options: SqliteConnectOptions, connect_timeout: Duration) -> Self {
        Self {
            options,
            connect_timeout,
        }
    }

    /// Creates a provider from the shared database configuration
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Configuration` if the URL cannot be parsed
    pub fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Ok(Self::new(config.connect_options()?, config.connect_timeout))
    }
}

#[async_trait]
impl ConnectionProvider for DirectConnectionProvider {
    async fn get_connection(&self) -> Result<Lease<'static>, DatabaseError> {
        let connect = self.options.connect();
        let conn = tokio::time::timeout(self.connect_timeout, connect)
            .await
            .map_err(|_| DatabaseError::ConnectionFailed {
                reason: format!("connect timed out after {:?}", self.connect_timeout),
                source: None,
            })?
            .map_err(|e| DatabaseError::connection("failed to open connection", e))?;

        Ok(Lease::Dedicated(conn))
    }

    fn describe(&self) -> &'static str {
        "direct"
    }
}

/// Draws connections from a bounded pool
///
/// Callers beyond the pool's maximum size wait until a connection is
/// returned or the pool's acquire timeout elapses.
#[derive(Debug, Clone)]
pub struct PooledConnectionProvider {
    pool: DatabasePool,
}

impl PooledConnectionProvider {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

#[async_trait]
impl ConnectionProvider for PooledConnectionProvider {
    async fn get_connection(&self) -> Result<Lease<'static>, DatabaseError> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| DatabaseError::connection("failed to acquire pooled connection", e))?;

        debug!(size = self.pool.size(), idle = self.pool.num_idle(), "acquired pooled connection");
        Ok(Lease::Pooled(conn))
    }

    fn describe(&self) -> &'static str {
        "pooled"
    }
}

/// A connection held by a caller for the duration of one operation
///
/// The variant records who owns the physical connection:
/// - `Dedicated` was opened for this caller and is closed on release
/// - `Pooled` belongs to a pool and is returned to it on release
/// - `Borrowed` belongs to a unit of work and is left open on release
pub enum Lease<'c> {
    Dedicated(SqliteConnection),
    Pooled(PoolConnection<Sqlite>),
    Borrowed(&'c mut SqliteConnection),
}

impl Lease<'_> {
    /// Returns true if the connection is owned by someone else
    pub fn is_borrowed(&self) -> bool {
        matches!(self, Lease::Borrowed(_))
    }

    /// Returns the kind of lease for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Lease::Dedicated(_) => "dedicated",
            Lease::Pooled(_) => "pooled",
            Lease::Borrowed(_) => "borrowed",
        }
    }

    /// Returns the identity of the session behind this lease
    pub async fn id(&mut self) -> Result<ConnectionId, DatabaseError> {
        connection_id(self).await
    }
}

impl Deref for Lease<'_> {
    type Target = SqliteConnection;

    fn deref(&self) -> &SqliteConnection {
        match self {
            Lease::Dedicated(conn) => conn,
            Lease::Pooled(conn) => &**conn,
            Lease::Borrowed(conn) => &**conn,
        }
    }
}

impl DerefMut for Lease<'_> {
    fn deref_mut(&mut self) -> &mut SqliteConnection {
        match self {
            Lease::Dedicated(conn) => conn,
            Lease::Pooled(conn) => &mut **conn,
            Lease::Borrowed(conn) => &mut **conn,
        }
    }
}

impl fmt::Debug for Lease<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Lease").field(&self.kind()).finish()
    }
}

/// Opaque identity of a physical database session
///
/// Two handles with equal ids talk to the same session. Ids are only
/// meaningful while the session is open; a closed session's id may be
/// reused by a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(usize);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{:x}", self.0)
    }
}

/// Returns the identity of the session behind `conn`
///
/// # Errors
///
/// Returns `DatabaseError::Persistence` if the connection's worker has
/// already shut down
pub async fn connection_id(conn: &mut SqliteConnection) -> Result<ConnectionId, DatabaseError> {
    let raw = {
        let mut handle = conn.lock_handle().await?;
        handle.as_raw_handle().as_ptr() as usize
    };
    Ok(ConnectionId(raw))
}
