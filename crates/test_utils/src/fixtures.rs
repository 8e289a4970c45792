//! Pre-built Test Fixtures
//!
//! Members with fixed ids and balances, so tests read the same way across
//! crates.

use core_kernel::{Member, MemberId};

/// Fixture for member test data
pub struct MemberFixtures;

impl MemberFixtures {
    /// The member used by the basic repository scenarios
    pub fn member_v0() -> Member {
        Member::with_id(Self::id("memberV0"), 10000)
    }

    /// Sender in transfer scenarios
    pub fn member_a() -> Member {
        Member::with_id(Self::id("memberA"), 10000)
    }

    /// Recipient in transfer scenarios
    pub fn member_b() -> Member {
        Member::with_id(Self::id("memberB"), 10000)
    }

    /// An id that is never inserted by any fixture
    pub fn unknown_id() -> MemberId {
        Self::id("ghost")
    }

    /// Parses a fixture id
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid member id
    pub fn id(value: &str) -> MemberId {
        MemberId::parse(value).expect("fixture member id must be valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_ids_are_distinct() {
        let ids = [
            MemberFixtures::member_v0().member_id().clone(),
            MemberFixtures::member_a().member_id().clone(),
            MemberFixtures::member_b().member_id().clone(),
            MemberFixtures::unknown_id(),
        ];

        for (i, a) in ids.iter().enumerate() {
            for b in ids.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
