//! Integration tests for the member repository
//!
//! Every test runs against its own migrated SQLite file. The same scenarios
//! are exercised through the pooled and the direct connection providers.

use std::time::Duration;

use core_kernel::Member;
use infra_db::{DatabaseError, MemberRepository};
use proptest::prelude::*;
use proptest::test_runner::TestRunner;
use test_utils::{
    assert_duplicate_key, assert_not_found, member_strategy, MemberFixtures, TestDatabase,
};

async fn pooled() -> (TestDatabase, MemberRepository) {
    let db = TestDatabase::new().await.unwrap();
    let repo = MemberRepository::pooled(db.pool().clone());
    (db, repo)
}

async fn direct() -> (TestDatabase, MemberRepository) {
    let db = TestDatabase::new().await.unwrap();
    let repo = MemberRepository::direct(db.config()).unwrap();
    (db, repo)
}

/// save, find, update, find, delete, find
async fn run_crud_scenario(repo: &MemberRepository) {
    let member = MemberFixtures::member_v0();

    let saved = repo.save(&member).await.unwrap();
    assert_eq!(saved, member);

    let found = repo.find_by_id(member.member_id()).await.unwrap();
    assert_eq!(found, member);

    let rows = repo.update(member.member_id(), 20000).await.unwrap();
    assert_eq!(rows, 1);

    let updated = repo.find_by_id(member.member_id()).await.unwrap();
    assert_eq!(updated.money(), 20000);
    assert_eq!(updated, member.with_money(20000));

    let rows = repo.delete(member.member_id()).await.unwrap();
    assert_eq!(rows, 1);

    assert_not_found(repo.find_by_id(member.member_id()).await);
}

// ============= CRUD TESTS =============
mod crud_tests {
    use super::*;

    #[tokio::test]
    async fn test_crud_through_pool() {
        let (_db, repo) = pooled().await;
        run_crud_scenario(&repo).await;
    }

    #[tokio::test]
    async fn test_crud_through_direct_connections() {
        let (_db, repo) = direct().await;
        run_crud_scenario(&repo).await;
    }

    #[tokio::test]
    async fn test_direct_and_pooled_see_the_same_rows() {
        let (db, pooled_repo) = pooled().await;
        let direct_repo = MemberRepository::direct(db.config()).unwrap();
        let member = MemberFixtures::member_a();

        direct_repo.save(&member).await.unwrap();

        assert_eq!(pooled_repo.find_by_id(member.member_id()).await.unwrap(), member);
    }

    #[tokio::test]
    async fn test_save_stores_negative_balance() {
        let (_db, repo) = pooled().await;
        let member = Member::new("overdrawn", -250).unwrap();

        repo.save(&member).await.unwrap();

        assert_eq!(repo.find_by_id(member.member_id()).await.unwrap().money(), -250);
    }

    #[tokio::test]
    async fn test_save_stores_extreme_balances() {
        let (_db, repo) = pooled().await;
        let max = Member::new("max", i32::MAX).unwrap();
        let min = Member::new("min", i32::MIN).unwrap();

        repo.save(&max).await.unwrap();
        repo.save(&min).await.unwrap();

        assert_eq!(repo.find_by_id(max.member_id()).await.unwrap(), max);
        assert_eq!(repo.find_by_id(min.member_id()).await.unwrap(), min);
    }

    #[tokio::test]
    async fn test_ids_are_case_sensitive() {
        let (_db, repo) = pooled().await;

        repo.save(&Member::new("abc", 1).unwrap()).await.unwrap();
        repo.save(&Member::new("ABC", 2).unwrap()).await.unwrap();

        let lower = repo.find_by_id(&MemberFixtures::id("abc")).await.unwrap();
        assert_eq!(lower.money(), 1);
    }
}

// ============= FAILURE TESTS =============
mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_find_unknown_id_is_not_found() {
        let (_db, repo) = pooled().await;

        let err = repo.find_by_id(&MemberFixtures::unknown_id()).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(!err.is_persistence());
        assert!(err.to_string().contains("ghost"));
    }

    #[tokio::test]
    async fn test_duplicate_save_is_duplicate_key() {
        let (_db, repo) = pooled().await;
        let member = MemberFixtures::member_v0();
        repo.save(&member).await.unwrap();

        let result = repo.save(&member.with_money(1)).await;

        assert_duplicate_key(result);
        let stored = repo.find_by_id(member.member_id()).await.unwrap();
        assert_eq!(stored.money(), member.money());
    }

    #[tokio::test]
    async fn test_duplicate_save_keeps_driver_error() {
        let (_db, repo) = direct().await;
        let member = MemberFixtures::member_v0();
        repo.save(&member).await.unwrap();

        let err = repo.save(&member).await.unwrap_err();

        assert!(matches!(err.driver_error(), Some(sqlx::Error::Database(_))));
    }

    #[tokio::test]
    async fn test_update_unknown_id_affects_no_rows() {
        let (_db, repo) = pooled().await;

        let rows = repo.update(&MemberFixtures::unknown_id(), 5).await.unwrap();

        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_affects_no_rows() {
        let (_db, repo) = pooled().await;

        let rows = repo.delete(&MemberFixtures::unknown_id()).await.unwrap();

        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_unreachable_database_is_connection_failure() {
        let config = infra_db::DatabaseConfig::new("sqlite:///no/such/directory/members.db")
            .connect_timeout(Duration::from_secs(2));
        let repo = MemberRepository::direct(&config).unwrap();

        let err = repo.find_by_id(&MemberFixtures::unknown_id()).await.unwrap_err();

        assert!(err.is_connection_error(), "got {err:?}");
        assert!(!matches!(err, DatabaseError::NotFound { .. }));
    }
}

// ============= RESOURCE TESTS =============
mod resource_tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_save_returns_connection_to_pool() {
        let db = TestDatabase::with_config(|config| {
            config
                .max_connections(1)
                .connect_timeout(Duration::from_secs(2))
        })
        .await
        .unwrap();
        let repo = MemberRepository::pooled(db.pool().clone());
        let member = MemberFixtures::member_v0();
        repo.save(&member).await.unwrap();

        for _ in 0..5 {
            assert_duplicate_key(repo.save(&member).await);
        }

        // with one slot, a leaked connection would time the next call out
        assert_eq!(repo.find_by_id(member.member_id()).await.unwrap(), member);
    }

    #[tokio::test]
    async fn test_not_found_returns_connection_to_pool() {
        let db = TestDatabase::with_config(|config| {
            config
                .max_connections(1)
                .connect_timeout(Duration::from_secs(2))
        })
        .await
        .unwrap();
        let repo = MemberRepository::pooled(db.pool().clone());

        for _ in 0..5 {
            assert_not_found(repo.find_by_id(&MemberFixtures::unknown_id()).await);
        }

        let member = MemberFixtures::member_a();
        repo.save(&member).await.unwrap();
    }

    #[tokio::test]
    async fn test_direct_repository_survives_many_calls() {
        let (db, repo) = direct().await;

        for money in 0..20 {
            let member = Member::new(format!("m{money}"), money).unwrap();
            repo.save(&member).await.unwrap();
        }

        assert_eq!(db.member_count().await.unwrap(), 20);
    }
}

// ============= PROPERTY TESTS =============
mod property_tests {
    use super::*;

    #[test]
    fn prop_save_then_find_round_trips() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let db = rt.block_on(TestDatabase::new()).unwrap();
        let repo = MemberRepository::pooled(db.pool().clone());

        let mut runner = TestRunner::new(ProptestConfig::with_cases(32));
        runner
            .run(&member_strategy(), |member| {
                rt.block_on(async {
                    db.clear_data().await.unwrap();

                    let saved = repo.save(&member).await.unwrap();
                    let found = repo.find_by_id(member.member_id()).await.unwrap();

                    prop_assert_eq!(&saved, &member);
                    prop_assert_eq!(found, member);
                    Ok(())
                })
            })
            .unwrap();
    }
}
