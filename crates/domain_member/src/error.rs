//! Member domain errors

use core_kernel::MemberId;
use infra_db::DatabaseError;
use thiserror::Error;

/// Errors that can occur while moving money between members
#[derive(Debug, Error)]
pub enum TransferError {
    /// Transfer amounts must be strictly positive
    #[error("Invalid transfer amount: {0}")]
    InvalidAmount(i32),

    /// Sender and recipient are the same member
    #[error("Cannot transfer from member {0} to itself")]
    SameAccount(MemberId),

    /// The sender's balance does not cover the amount
    #[error("Insufficient funds for member {member_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        member_id: MemberId,
        balance: i32,
        requested: i32,
    },

    /// The recipient's balance would exceed the representable range
    #[error("Balance overflow for member {member_id}")]
    BalanceOverflow { member_id: MemberId },

    /// Storage failure, including an unknown member
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl TransferError {
    /// Checks if the transfer failed because a member does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransferError::Database(e) if e.is_not_found())
    }

    /// Checks if the transfer was rejected by a business rule
    pub fn is_rejected(&self) -> bool {
        !matches!(self, TransferError::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> MemberId {
        MemberId::parse(value).unwrap()
    }

    #[test]
    fn test_insufficient_funds_message() {
        let error = TransferError::InsufficientFunds {
            member_id: id("memberA"),
            balance: 10,
            requested: 20,
        };

        let message = error.to_string();
        assert!(message.contains("memberA"));
        assert!(message.contains("20"));
        assert!(error.is_rejected());
    }

    #[test]
    fn test_not_found_passes_through() {
        let error = TransferError::from(DatabaseError::not_found("Member", "ghost"));

        assert!(error.is_not_found());
        assert!(!error.is_rejected());
        assert_eq!(error.to_string(), "Member not found: ghost");
    }
}
