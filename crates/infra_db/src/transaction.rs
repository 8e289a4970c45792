//! Units of work
//!
//! A [`UnitOfWork`] owns one connection with an open transaction. Repository
//! calls join it explicitly (see `MemberRepository::session`), so every
//! statement issued through it runs on the same session and commits or rolls
//! back together. Nothing is bound to the calling thread; the handle itself
//! is the context.

use std::sync::Arc;
use std::time::Instant;

use sqlx::sqlite::SqliteConnection;
use tracing::{debug, info, warn};

use crate::connection::{connection_id, ConnectionId, ConnectionProvider, Lease};
use crate::error::DatabaseError;
use crate::resources;

/// Starts units of work on connections from a provider
#[derive(Debug, Clone)]
pub struct TransactionManager {
    provider: Arc<dyn ConnectionProvider>,
}

impl TransactionManager {
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self { provider }
    }

    /// Begins a new unit of work
    ///
    /// The transaction takes the database write lock up front
    /// (`BEGIN IMMEDIATE`), so two concurrent units of work serialize at
    /// `begin` rather than failing at their first write.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::ConnectionFailed` if no connection is available
    /// and `DatabaseError::TransactionFailed` if the transaction cannot start
    pub async fn begin(&self) -> Result<UnitOfWork, DatabaseError> {
        let mut lease = self.provider.get_connection().await?;

        if let Err(e) = sqlx::query("BEGIN IMMEDIATE").execute(&mut *lease).await {
            resources::release(lease).await;
            return Err(DatabaseError::transaction("failed to begin transaction", Some(e)));
        }

        debug!(provider = self.provider.describe(), "began unit of work");
        Ok(UnitOfWork {
            lease: Some(lease),
            started_at: Instant::now(),
        })
    }
}

/// A connection bound to one open transaction
///
/// The unit of work owns its connection: repository calls made through it
/// borrow the connection and never close it. Ending the unit of work with
/// [`commit`](Self::commit) or [`rollback`](Self::rollback) releases the
/// connection. Dropping it unfinished discards the connection, which rolls
/// the transaction back.
#[derive(Debug)]
pub struct UnitOfWork {
    lease: Option<Lease<'static>>,
    started_at: Instant,
}

impl UnitOfWork {
    /// Returns the connection bound to this unit of work
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::TransactionFailed` if the unit of work has
    /// already ended
    pub fn connection(&mut self) -> Result<&mut SqliteConnection, DatabaseError> {
        match self.lease.as_mut() {
            Some(lease) => Ok(&mut **lease),
            None => Err(DatabaseError::transaction("unit of work already ended", None)),
        }
    }

    /// Returns the identity of the bound session
    pub async fn connection_id(&mut self) -> Result<ConnectionId, DatabaseError> {
        connection_id(self.connection()?).await
    }

    /// Commits every statement issued through this unit of work
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::TransactionFailed` if the commit fails; the
    /// connection is discarded in that case
    pub async fn commit(mut self) -> Result<(), DatabaseError> {
        self.finish("COMMIT").await
    }

    /// Rolls back every statement issued through this unit of work
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::TransactionFailed` if the rollback fails; the
    /// connection is discarded in that case
    pub async fn rollback(mut self) -> Result<(), DatabaseError> {
        self.finish("ROLLBACK").await
    }

    async fn finish(&mut self, statement: &'static str) -> Result<(), DatabaseError> {
        let Some(mut lease) = self.lease.take() else {
            return Err(DatabaseError::transaction("unit of work already ended", None));
        };

        match sqlx::query(statement).execute(&mut *lease).await {
            Ok(_) => {
                info!(
                    statement,
                    elapsed_ms = self.started_at.elapsed().as_millis() as u64,
                    "unit of work ended"
                );
                resources::release(lease).await;
                Ok(())
            }
            Err(e) => {
                warn!(statement, error = %e, "failed to end unit of work, discarding connection");
                resources::discard(lease);
                Err(DatabaseError::transaction(format!("{} failed", statement), Some(e)))
            }
        }
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if let Some(lease) = self.lease.take() {
            warn!("unit of work dropped without commit or rollback, discarding connection");
            resources::discard(lease);
        }
    }
}
