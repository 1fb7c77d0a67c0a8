use serde::Serialize;

use super::ValidationError;

/// A non-negative credit balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Credits(i64);

impl Credits {
    pub const ZERO: Credits = Credits(0);

    pub fn parse(value: i64) -> Result<Self, ValidationError> {
        if value < 0 {
            return Err(ValidationError::new(format!(
                "Credits cannot be negative: {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value_of(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Credits) -> Option<Credits> {
        self.0.checked_add(other.0).map(Credits)
    }

    /// `None` when the result would be negative.
    pub fn checked_sub(self, other: Credits) -> Option<Credits> {
        match self.0 - other.0 {
            x if x < 0 => None,
            x => Some(Credits(x)),
        }
    }
}

/// A strictly positive amount of credits moved by a single pledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PledgeAmount(Credits);

impl PledgeAmount {
    pub fn parse(value: i64) -> Result<Self, ValidationError> {
        if value < 1 {
            return Err(ValidationError::new(format!(
                "Pledge amount must be a positive integer: {value}"
            )));
        }
        Ok(Self(Credits(value)))
    }

    pub fn credits(&self) -> Credits {
        self.0
    }
}
