//! Core Kernel - Foundational types for the member ledger
//!
//! This crate provides the building blocks shared by the database, domain
//! and interface layers:
//! - The `Member` entity and its `MemberId` identifier
//! - The common `CoreError` type for validation failures

pub mod member;
pub mod error;

pub use member::{Member, MemberId, MEMBER_ID_MAX_LEN};
pub use error::CoreError;
