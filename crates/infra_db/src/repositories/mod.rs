//! Repository implementations
//!
//! Repositories hold SQL text and row mapping only. Connection handling,
//! parameter binding and failure translation live in [`crate::template`].

pub mod member;

pub use member::{row_to_member, MemberRepository, MemberSession};
