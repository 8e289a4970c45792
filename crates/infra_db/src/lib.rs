//! Infrastructure Database Layer
//!
//! This crate provides database access for the member ledger on SQLite using
//! SQLx.
//!
//! # Architecture
//!
//! - [`connection`]: providers that hand out a connection per call, either a
//!   fresh one or one drawn from a bounded pool
//! - [`resources`]: releases connections the way they were obtained
//! - [`transaction`]: units of work that pin several calls to one connection
//! - [`error`]: `DatabaseError` and the driver failure translators
//! - [`template`]: the acquire, bind, execute, map, release sequence
//! - [`repositories`]: SQL and row mapping for members
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, MemberRepository};
//!
//! let pool = create_pool(&DatabaseConfig::new("sqlite://members.db")).await?;
//! run_migrations(&pool).await?;
//! let repo = MemberRepository::pooled(pool);
//! let member = repo.find_by_id(&"memberV0".parse()?).await?;
//! ```

pub mod pool;
pub mod error;
pub mod connection;
pub mod resources;
pub mod transaction;
pub mod template;
pub mod schema;
pub mod repositories;

pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use error::{DatabaseError, ErrorTranslator, PersistenceKind, SqliteCodeTranslator, WrappingTranslator};
pub use connection::{
    ConnectionId, ConnectionProvider, DirectConnectionProvider, Lease, PooledConnectionProvider,
};
pub use transaction::{TransactionManager, UnitOfWork};
pub use template::{SqlTemplate, SqlValue};
pub use schema::{run_migrations, MIGRATOR};
pub use repositories::{MemberRepository, MemberSession};
