//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! member ledger test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built members used across tests
//! - `database`: Throwaway SQLite databases with the schema applied
//! - `assertions`: Assertion helpers for database outcomes
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
