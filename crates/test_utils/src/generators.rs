//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{Member, MemberId};
use proptest::prelude::*;

/// Strategy for raw identifiers that pass `MemberId` validation
pub fn member_id_string_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9_-]{0,9}"
}

/// Strategy for generating valid member ids
pub fn member_id_strategy() -> impl Strategy<Value = MemberId> {
    member_id_string_strategy().prop_filter_map("valid member id", |s| MemberId::parse(s).ok())
}

/// Strategy for arbitrary balances, including negative ones
pub fn money_strategy() -> impl Strategy<Value = i32> {
    any::<i32>()
}

/// Strategy for generating members
pub fn member_strategy() -> impl Strategy<Value = Member> {
    (member_id_strategy(), money_strategy()).prop_map(|(id, money)| Member::with_id(id, money))
}

/// Strategy for identifiers longer than the column allows
pub fn overlong_member_id_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{11,30}"
}
