//! Member DTOs

use core_kernel::Member;
use domain_member::TransferReceipt;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMemberRequest {
    #[validate(length(min = 1, max = 10))]
    pub member_id: String,
    pub money: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub money: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TransferRequest {
    #[validate(length(min = 1, max = 10))]
    pub from: String,
    #[validate(length(min = 1, max = 10))]
    pub to: String,
    #[validate(range(min = 1))]
    pub amount: i32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberResponse {
    pub member_id: String,
    pub money: i32,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            member_id: member.member_id().to_string(),
            money: member.money(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferResponse {
    pub from: MemberResponse,
    pub to: MemberResponse,
    pub amount: i32,
}

impl From<TransferReceipt> for TransferResponse {
    fn from(receipt: TransferReceipt) -> Self {
        Self {
            from: receipt.from.into(),
            to: receipt.to.into(),
            amount: receipt.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::MEMBER_ID_MAX_LEN;

    #[test]
    fn test_member_id_length_is_validated() {
        let ok = CreateMemberRequest {
            member_id: "memberV0".to_string(),
            money: 0,
        };
        let empty = CreateMemberRequest {
            member_id: String::new(),
            money: 0,
        };
        let long = CreateMemberRequest {
            member_id: "x".repeat(MEMBER_ID_MAX_LEN + 1),
            money: 0,
        };

        assert!(ok.validate().is_ok());
        assert!(empty.validate().is_err());
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_transfer_amount_must_be_positive() {
        let request = TransferRequest {
            from: "memberA".to_string(),
            to: "memberB".to_string(),
            amount: 0,
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("amount"));
    }
}
