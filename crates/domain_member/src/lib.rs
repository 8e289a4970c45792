//! Member Ledger Domain
//!
//! Use cases that span several repository calls. Each use case runs inside
//! one unit of work, so its statements share a connection and either all
//! take effect or none do.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_member::MemberService;
//!
//! let service = MemberService::pooled(pool);
//! let receipt = service.account_transfer(&from, &to, 2000).await?;
//! ```

pub mod error;
pub mod service;

pub use error::TransferError;
pub use service::{MemberService, TransferReceipt};
