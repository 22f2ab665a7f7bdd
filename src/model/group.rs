use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rand::Rng;
use rocket::request::FromParam;
use serde::{Deserialize, Serialize};

use crate::model::preferences::UserPreferences;

/// Number of characters in a group code.
pub const CODE_LENGTH: usize = 6;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A group's shareable join code: 6 ASCII-alphanumeric characters,
/// case-insensitive. Normalized to uppercase at every boundary so that
/// `abc123` and `ABC123` name the same group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupCode(String);

impl GroupCode {
    /// Generate a fresh random code.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let code = (0..CODE_LENGTH)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for GroupCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if code.len() != CODE_LENGTH || !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(format!(
                "'{s}' is not a valid group code (expected {CODE_LENGTH} alphanumeric characters)"
            ));
        }
        Ok(Self(code))
    }
}

impl TryFrom<String> for GroupCode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<GroupCode> for String {
    fn from(code: GroupCode) -> Self {
        code.0
    }
}

impl Display for GroupCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'r> FromParam<'r> for GroupCode {
    type Error = String;

    fn from_param(param: &'r str) -> Result<Self, Self::Error> {
        param.parse()
    }
}

/// One group planning one trip together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTrip {
    pub code: GroupCode,
    /// Target group size, fixed at creation. Progress is reported against
    /// this, not against how many members have joined so far.
    pub expected_users: u32,
    pub members: HashMap<String, UserPreferences>,
}

impl GroupTrip {
    pub fn new(code: GroupCode, expected_users: u32) -> Self {
        Self {
            code,
            expected_users,
            members: HashMap::new(),
        }
    }

    /// Aggregate preference-collection progress. Pure and side-effect-free;
    /// repeated calls on the same snapshot yield identical results.
    pub fn status(&self) -> GroupStatus {
        let completed = self.members.values().filter(|m| m.completed).count() as u32;
        let total = self.expected_users;
        let mut members: Vec<MemberStatus> = self
            .members
            .values()
            .map(|m| MemberStatus {
                user_id: m.user_id.clone(),
                completed: m.completed,
            })
            .collect();
        members.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        GroupStatus {
            completed,
            total,
            all_completed: total > 0 && completed == total,
            members,
        }
    }
}

/// Snapshot of how far a group has got through preference collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStatus {
    pub completed: u32,
    pub total: u32,
    pub all_completed: bool,
    pub members: Vec<MemberStatus>,
}

impl GroupStatus {
    /// Status of a group nobody has created: zero progress, not an error.
    pub fn unknown_group() -> Self {
        Self {
            completed: 0,
            total: 0,
            all_completed: false,
            members: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStatus {
    pub user_id: String,
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::preferences::UserPreferences;

    fn code() -> GroupCode {
        "TRIP42".parse().unwrap()
    }

    #[test]
    fn codes_normalize_to_uppercase() {
        let lower: GroupCode = "abc123".parse().unwrap();
        let upper: GroupCode = "ABC123".parse().unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.as_str(), "ABC123");
    }

    #[test]
    fn invalid_codes_are_rejected() {
        assert!("".parse::<GroupCode>().is_err());
        assert!("ABC12".parse::<GroupCode>().is_err());
        assert!("ABC1234".parse::<GroupCode>().is_err());
        assert!("ABC 12".parse::<GroupCode>().is_err());
        assert!("ABC-12".parse::<GroupCode>().is_err());
    }

    #[test]
    fn generated_codes_are_well_formed() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let code = GroupCode::generate(&mut rng);
            assert!(code.as_str().parse::<GroupCode>().is_ok());
        }
    }

    #[test]
    fn status_counts_completed_members_against_expected_size() {
        let mut trip = GroupTrip::new(code(), 3);
        trip.members.insert(
            "alice".to_string(),
            UserPreferences::example_completed("alice"),
        );
        trip.members
            .insert("bob".to_string(), UserPreferences::example_completed("bob"));

        // Two submitted, one yet to join: progress is against the target size.
        let status = trip.status();
        assert_eq!(status.completed, 2);
        assert_eq!(status.total, 3);
        assert!(!status.all_completed);
    }

    #[test]
    fn status_reports_all_completed_once_everyone_has_submitted() {
        let mut trip = GroupTrip::new(code(), 3);
        for user in ["alice", "bob", "carol"] {
            trip.members
                .insert(user.to_string(), UserPreferences::example_completed(user));
        }

        let status = trip.status();
        assert_eq!(status.completed, 3);
        assert_eq!(status.total, 3);
        assert!(status.all_completed);
    }

    #[test]
    fn incomplete_submissions_do_not_count() {
        let mut trip = GroupTrip::new(code(), 2);
        trip.members
            .insert("alice".to_string(), UserPreferences::example("alice"));

        let status = trip.status();
        assert_eq!(status.completed, 0);
        assert!(!status.all_completed);
    }

    #[test]
    fn status_is_idempotent() {
        let mut trip = GroupTrip::new(code(), 2);
        trip.members.insert(
            "alice".to_string(),
            UserPreferences::example_completed("alice"),
        );
        assert_eq!(trip.status(), trip.status());
    }

    #[test]
    fn unknown_group_status_is_all_zeroes() {
        let status = GroupStatus::unknown_group();
        assert_eq!(status.completed, 0);
        assert_eq!(status.total, 0);
        assert!(!status.all_completed);
    }
}
