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
pub struct TaskId(i64);

impl TaskId {
    pub fn parse(id: i64) -> Result<Self, ValidationError> {
        if id < 1 {
            return Err(ValidationError::new(format!(
                "Invalid task ID: {id} is not a positive integer"
            )));
        }
        Ok(Self(id))
    }

    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl AsRef<i64> for TaskId {
    fn as_ref(&self) -> &i64 {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[test]
fn test_valid_ids() {
    let parsed = TaskId::parse(12).expect("valid task ID");
    assert_eq!(*parsed.as_ref(), 12);
    assert_eq!(parsed.to_string(), "12");
}

#[test]
fn test_invalid_ids() {
    let error = TaskId::parse(0).expect_err("zero is not a task ID");
    assert_eq!(
        error.as_ref(),
        "Invalid task ID: 0 is not a positive integer"
    );
}
