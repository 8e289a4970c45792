//! Database error types and exception translation
//!
//! Every driver failure that leaves this crate is expressed as a
//! `DatabaseError`. Connection acquisition failures, statement failures and
//! "no such row" outcomes are distinct variants so callers never have to
//! inspect driver internals to tell them apart.

use std::fmt;

use sqlx::error::ErrorKind;
use thiserror::Error;

/// SQLite extended result code for a PRIMARY KEY violation
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
/// SQLite extended result code for a UNIQUE violation
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// No connection could be obtained from the driver or the pool
    #[error("Failed to obtain a database connection: {reason}")]
    ConnectionFailed {
        reason: String,
        #[source]
        source: Option<sqlx::Error>,
    },

    /// A lookup matched zero rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A statement failed to prepare or execute
    #[error("{kind}: {source}")]
    Persistence {
        kind: PersistenceKind,
        #[source]
        source: sqlx::Error,
    },

    /// A unit of work could not be started or finished
    #[error("Transaction failed: {reason}")]
    TransactionFailed {
        reason: String,
        #[source]
        source: Option<sqlx::Error>,
    },

    /// Schema migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),

    /// Invalid connection settings
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Classification of a persistence failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceKind {
    /// A row with the same key already exists
    DuplicateKey,
    /// Any other integrity constraint was violated
    ConstraintViolation,
    /// Everything else: syntax errors, decode errors, I/O mid-query
    Other,
}

impl fmt::Display for PersistenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PersistenceKind::DuplicateKey => "Duplicate key",
            PersistenceKind::ConstraintViolation => "Constraint violation",
            PersistenceKind::Other => "Persistence failure",
        };
        f.write_str(label)
    }
}

impl DatabaseError {
    /// Creates a connection failure caused by a driver error
    pub fn connection(reason: impl Into<String>, source: sqlx::Error) -> Self {
        DatabaseError::ConnectionFailed {
            reason: reason.into(),
            source: Some(source),
        }
    }

    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Member", "memberV0");
    /// assert!(error.to_string().contains("memberV0"));
    /// assert!(error.is_not_found());
    /// ```
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        DatabaseError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a transaction failure
    pub fn transaction(reason: impl Into<String>, source: Option<sqlx::Error>) -> Self {
        DatabaseError::TransactionFailed {
            reason: reason.into(),
            source,
        }
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound { .. })
    }

    /// Checks if this error is a connection acquisition failure
    pub fn is_connection_error(&self) -> bool {
        matches!(self, DatabaseError::ConnectionFailed { .. })
    }

    /// Checks if this error is a statement-level persistence failure
    pub fn is_persistence(&self) -> bool {
        matches!(self, DatabaseError::Persistence { .. })
    }

    /// Checks if this error is a duplicate key violation
    pub fn is_duplicate_key(&self) -> bool {
        matches!(
            self,
            DatabaseError::Persistence {
                kind: PersistenceKind::DuplicateKey,
                ..
            }
        )
    }

    /// Returns the underlying driver error, if there is one
    pub fn driver_error(&self) -> Option<&sqlx::Error> {
        match self {
            DatabaseError::ConnectionFailed { source, .. } => source.as_ref(),
            DatabaseError::TransactionFailed { source, .. } => source.as_ref(),
            DatabaseError::Persistence { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Converts SQLx errors using the default error-code classification
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::Persistence {
            kind: classify(&error),
            source: error,
        }
    }
}

/// Strategy for turning driver failures into `DatabaseError`
///
/// Translation is a pure mapping: the original driver error always survives
/// as the source of the returned error.
pub trait ErrorTranslator: Send + Sync + fmt::Debug {
    /// Translates a failure raised while running `sql`
    fn translate(&self, sql: &str, error: sqlx::Error) -> DatabaseError;
}

/// Wraps every driver failure as an unclassified persistence failure
#[derive(Debug, Clone, Copy, Default)]
pub struct WrappingTranslator;

impl ErrorTranslator for WrappingTranslator {
    fn translate(&self, _sql: &str, error: sqlx::Error) -> DatabaseError {
        DatabaseError::Persistence {
            kind: PersistenceKind::Other,
            source: error,
        }
    }
}

/// Classifies driver failures by their constraint kind and SQLite result code
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteCodeTranslator;

impl ErrorTranslator for SqliteCodeTranslator {
    fn translate(&self, _sql: &str, error: sqlx::Error) -> DatabaseError {
        DatabaseError::from(error)
    }
}

fn classify(error: &sqlx::Error) -> PersistenceKind {
    let sqlx::Error::Database(db_err) = error else {
        return PersistenceKind::Other;
    };

    match db_err.kind() {
        ErrorKind::UniqueViolation => PersistenceKind::DuplicateKey,
        ErrorKind::ForeignKeyViolation | ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
            PersistenceKind::ConstraintViolation
        }
        _ => match db_err.code().as_deref() {
            Some(SQLITE_CONSTRAINT_PRIMARYKEY) | Some(SQLITE_CONSTRAINT_UNIQUE) => {
                PersistenceKind::DuplicateKey
            }
            _ => PersistenceKind::Other,
        },
    }
}
