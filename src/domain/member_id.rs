use std::fmt;

use super::ValidationError;
use serde::Serialize;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
)]
pub struct MemberId(i64);

impl MemberId {
    pub fn parse(id: i64) -> Result<Self, ValidationError> {
        if id < 1 {
            return Err(ValidationError::new(format!(
                "Invalid member ID: {id} is not a positive integer"
            )));
        }
        Ok(Self(id))
    }

    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl AsRef<i64> for MemberId {
    fn as_ref(&self) -> &i64 {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[test]
fn test_valid_ids() {
    for valid_id in [1, 2, 42, i64::MAX] {
        let parsed = MemberId::parse(valid_id).expect("valid member ID");
        assert_eq!(
            *parsed.as_ref(),
            valid_id,
            "ID does not match expected value"
        );
    }
}

#[test]
fn test_invalid_ids() {
    for invalid_id in [0, -1, i64::MIN] {
        let error = MemberId::parse(invalid_id).expect_err("invalid member ID");
        assert_eq!(
            error.as_ref(),
            &format!("Invalid member ID: {invalid_id} is not a positive integer")
        );
    }
}

#[test]
fn test_serialises_as_bare_integer() {
    let json = serde_json::to_string(&MemberId::new(7)).unwrap();
    assert_eq!(json, "7");
}
