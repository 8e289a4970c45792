//! The member entity
//!
//! A member is identified by a short string key and holds an integer balance.
//! Equality is structural: two `Member` values with the same id and money are
//! the same member as far as the rest of the system is concerned.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Maximum length of a member identifier, matching the `member_id` column width
pub const MEMBER_ID_MAX_LEN: usize = 10;

/// Validated member identifier
///
/// Identifiers are non-empty, at most [`MEMBER_ID_MAX_LEN`] characters long
/// and carry no leading or trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(String);

impl MemberId {
    /// Parses and validates a member identifier
    ///
    /// # Arguments
    ///
    /// * `value` - The raw identifier
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the identifier is empty, too long,
    /// or padded with whitespace
    pub fn parse(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();

        if value.is_empty() {
            return Err(CoreError::validation("member id must not be empty"));
        }
        if value.chars().count() > MEMBER_ID_MAX_LEN {
            return Err(CoreError::validation(format!(
                "member id '{}' exceeds {} characters",
                value, MEMBER_ID_MAX_LEN
            )));
        }
        if value.trim() != value {
            return Err(CoreError::validation(format!(
                "member id '{}' has surrounding whitespace",
                value
            )));
        }

        Ok(Self(value))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MemberId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MemberId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> String {
        id.0
    }
}

impl AsRef<str> for MemberId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A ledger member and its balance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    member_id: MemberId,
    money: i32,
}

impl Member {
    /// Creates a member from a raw identifier and a balance
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the identifier is invalid
    ///
    /// # Example
    ///
    /// ```rust
    /// use core_kernel::Member;
    ///
    /// let member = Member::new("memberV0", 10000).unwrap();
    /// assert_eq!(member.member_id().as_str(), "memberV0");
    /// assert_eq!(member.money(), 10000);
    /// ```
    pub fn new(member_id: impl Into<String>, money: i32) -> Result<Self, CoreError> {
        Ok(Self::with_id(MemberId::parse(member_id)?, money))
    }

    /// Creates a member from an already validated identifier
    pub fn with_id(member_id: MemberId, money: i32) -> Self {
        Self { member_id, money }
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn money(&self) -> i32 {
        self.money
    }

    /// Returns the member as it reads after its balance is set to `money`
    pub fn with_money(&self, money: i32) -> Self {
        Self {
            member_id: self.member_id.clone(),
            money,
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Member(member_id={}, money={})", self.member_id, self.money)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_id_rejects_empty() {
        assert!(MemberId::parse("").is_err());
    }

    #[test]
    fn test_member_id_accepts_column_width() {
        let id = MemberId::parse("abcdefghij").unwrap();
        assert_eq!(id.as_str().len(), MEMBER_ID_MAX_LEN);
        assert!(MemberId::parse("abcdefghijk").is_err());
    }

    #[test]
    fn test_member_with_money_keeps_id() {
        let member = Member::new("memberA", 100).unwrap();
        let updated = member.with_money(250);

        assert_eq!(updated.member_id(), member.member_id());
        assert_eq!(updated.money(), 250);
        assert_eq!(member.money(), 100);
    }
}
