//! Resource release
//!
//! Statement and cursor handles are owned by sqlx and finalized when they go
//! out of scope; since both borrow the connection, they are always gone before
//! the connection itself can be released. What remains is giving the
//! connection back, which is where release failures can happen. Those are
//! logged and swallowed so they never replace the outcome of the operation
//! that used the connection.

use sqlx::Connection;
use tracing::{debug, warn};

use crate::connection::Lease;

/// Releases a connection lease
///
/// - Dedicated connections are closed
/// - Pooled connections are returned to their pool
/// - Borrowed connections are left untouched for their owning unit of work
pub async fn release(lease: Lease<'_>) {
    match lease {
        Lease::Dedicated(conn) => match conn.close().await {
            Ok(()) => debug!("closed dedicated connection"),
            Err(e) => warn!(error = %e, "failed to close connection"),
        },
        Lease::Pooled(conn) => {
            drop(conn);
            debug!("returned connection to pool");
        }
        Lease::Borrowed(_) => debug!("left transaction-bound connection open"),
    }
}

/// Throws a connection away without reusing it
///
/// Used when the session state is unknown, e.g. a transaction that could not
/// be finished. A pooled connection is detached so the pool opens a fresh one
/// in its place; dropping the physical connection makes the database roll
/// back whatever was left open on it.
pub fn discard(lease: Lease<'_>) {
    match lease {
        Lease::Dedicated(conn) => drop(conn),
        Lease::Pooled(conn) => drop(conn.detach()),
        Lease::Borrowed(_) => {}
    }
    debug!("discarded connection");
}
