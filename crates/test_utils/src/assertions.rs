//! Custom Test Assertions
//!
//! Provides assertion helpers for database outcomes that give more
//! meaningful failure messages than matching on the error by hand.

use infra_db::DatabaseError;

/// Asserts that a result failed with `DatabaseError::NotFound`
///
/// # Panics
///
/// Panics if the result is `Ok` or fails with any other error
pub fn assert_not_found<T: std::fmt::Debug>(result: Result<T, DatabaseError>) {
    match result {
        Err(DatabaseError::NotFound { .. }) => {}
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

/// Asserts that a result failed with a duplicate key violation
///
/// # Panics
///
/// Panics if the result is `Ok` or fails with any other error
pub fn assert_duplicate_key<T: std::fmt::Debug>(result: Result<T, DatabaseError>) {
    match result {
        Err(e) if e.is_duplicate_key() => {}
        other => panic!("Expected duplicate key violation, got {:?}", other),
    }
}

/// Asserts that a result failed because no connection could be obtained
///
/// # Panics
///
/// Panics if the result is `Ok` or fails with any other error
pub fn assert_connection_failed<T: std::fmt::Debug>(result: Result<T, DatabaseError>) {
    match result {
        Err(e) if e.is_connection_error() => {}
        other => panic!("Expected ConnectionFailed, got {:?}", other),
    }
}
