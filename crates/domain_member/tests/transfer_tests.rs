//! Integration tests for member transfers

use std::sync::Arc;

use core_kernel::Member;
use domain_member::{MemberService, TransferError};
use test_utils::{MemberFixtures, TestDatabase};

async fn setup() -> (TestDatabase, MemberService) {
    let db = TestDatabase::new().await.unwrap();
    let service = MemberService::pooled(db.pool().clone());
    service.repository().save(&MemberFixtures::member_a()).await.unwrap();
    service.repository().save(&MemberFixtures::member_b()).await.unwrap();
    (db, service)
}

async fn balance(service: &MemberService, member: &Member) -> i32 {
    service
        .repository()
        .find_by_id(member.member_id())
        .await
        .unwrap()
        .money()
}

// ============= SUCCESSFUL TRANSFER TESTS =============
mod success_tests {
    use super::*;

    #[tokio::test]
    async fn test_transfer_moves_money() {
        let (_db, service) = setup().await;
        let (a, b) = (MemberFixtures::member_a(), MemberFixtures::member_b());

        let receipt = service
            .account_transfer(a.member_id(), b.member_id(), 2000)
            .await
            .unwrap();

        assert_eq!(receipt.from, a.with_money(8000));
        assert_eq!(receipt.to, b.with_money(12000));
        assert_eq!(receipt.amount, 2000);
        assert_eq!(balance(&service, &a).await, 8000);
        assert_eq!(balance(&service, &b).await, 12000);
    }

    #[tokio::test]
    async fn test_transfer_of_whole_balance() {
        let (_db, service) = setup().await;
        let (a, b) = (MemberFixtures::member_a(), MemberFixtures::member_b());

        service
            .account_transfer(a.member_id(), b.member_id(), a.money())
            .await
            .unwrap();

        assert_eq!(balance(&service, &a).await, 0);
        assert_eq!(balance(&service, &b).await, 20000);
    }

    #[tokio::test]
    async fn test_receipt_serializes_balances() {
        let (_db, service) = setup().await;
        let (a, b) = (MemberFixtures::member_a(), MemberFixtures::member_b());

        let receipt = service
            .account_transfer(a.member_id(), b.member_id(), 1)
            .await
            .unwrap();
        let json = serde_json::to_value(&receipt).unwrap();

        assert_eq!(json["from"]["member_id"], "memberA");
        assert_eq!(json["from"]["money"], 9999);
        assert_eq!(json["to"]["money"], 10001);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_transfers_conserve_total() {
        let (_db, service) = setup().await;
        let service = Arc::new(service);
        let (a, b) = (MemberFixtures::member_a(), MemberFixtures::member_b());

        let mut handles = Vec::new();
        for i in 0..10 {
            let service = Arc::clone(&service);
            // alternate direction so both rows are contended
            let (from, to) = if i % 2 == 0 {
                (a.member_id().clone(), b.member_id().clone())
            } else {
                (b.member_id().clone(), a.member_id().clone())
            };
            handles.push(tokio::spawn(async move {
                service.account_transfer(&from, &to, 100 + i).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let total = balance(&service, &a).await + balance(&service, &b).await;
        assert_eq!(total, 20000);
        // a sends 100+102+104+106+108, receives 101+103+105+107+109
        assert_eq!(balance(&service, &a).await, 10005);
    }
}

// ============= REJECTED TRANSFER TESTS =============
mod rejection_tests {
    use super::*;

    #[tokio::test]
    async fn test_insufficient_funds_changes_nothing() {
        let (_db, service) = setup().await;
        let (a, b) = (MemberFixtures::member_a(), MemberFixtures::member_b());

        let err = service
            .account_transfer(a.member_id(), b.member_id(), 10001)
            .await
            .unwrap_err();

        match err {
            TransferError::InsufficientFunds {
                balance, requested, ..
            } => {
                assert_eq!(balance, 10000);
                assert_eq!(requested, 10001);
            }
            other => panic!("Expected InsufficientFunds, got {other:?}"),
        }
        assert_eq!(balance(&service, &a).await, 10000);
        assert_eq!(balance(&service, &b).await, 10000);
    }

    #[tokio::test]
    async fn test_non_positive_amounts_are_rejected() {
        let (_db, service) = setup().await;
        let (a, b) = (MemberFixtures::member_a(), MemberFixtures::member_b());

        for amount in [0, -1, i32::MIN] {
            let err = service
                .account_transfer(a.member_id(), b.member_id(), amount)
                .await
                .unwrap_err();
            assert!(matches!(err, TransferError::InvalidAmount(x) if x == amount));
        }
    }

    #[tokio::test]
    async fn test_transfer_to_self_is_rejected() {
        let (_db, service) = setup().await;
        let a = MemberFixtures::member_a();

        let err = service
            .account_transfer(a.member_id(), a.member_id(), 10)
            .await
            .unwrap_err();

        assert!(matches!(err, TransferError::SameAccount(_)));
    }

    #[tokio::test]
    async fn test_unknown_recipient_is_not_found() {
        let (_db, service) = setup().await;
        let a = MemberFixtures::member_a();

        let err = service
            .account_transfer(a.member_id(), &MemberFixtures::unknown_id(), 10)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(balance(&service, &a).await, 10000);
    }
}

// ============= ROLLBACK TESTS =============
mod rollback_tests {
    use super::*;

    #[tokio::test]
    async fn test_failure_after_debit_rolls_debit_back() {
        let (_db, service) = setup().await;
        let a = MemberFixtures::member_a();
        let rich = Member::new("rich", i32::MAX - 10).unwrap();
        service.repository().save(&rich).await.unwrap();

        let err = service
            .account_transfer(a.member_id(), rich.member_id(), 100)
            .await
            .unwrap_err();

        assert!(matches!(err, TransferError::BalanceOverflow { .. }));
        assert_eq!(balance(&service, &a).await, 10000);
        assert_eq!(balance(&service, &rich).await, i32::MAX - 10);
    }

    #[tokio::test]
    async fn test_service_usable_after_rollback() {
        let (_db, service) = setup().await;
        let (a, b) = (MemberFixtures::member_a(), MemberFixtures::member_b());

        service
            .account_transfer(a.member_id(), b.member_id(), 50000)
            .await
            .unwrap_err();
        service
            .account_transfer(a.member_id(), b.member_id(), 500)
            .await
            .unwrap();

        assert_eq!(balance(&service, &a).await, 9500);
    }
}
