use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use color_eyre::eyre::{eyre, Report};
use thiserror::Error;

use super::{LedgerStoreError, MemberId};

#[derive(Debug, Error)]
pub enum LedgerAPIError {
    #[error("Lifecycle error")]
    LifecycleError(#[from] LifecycleError),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
    #[error("Validation error")]
    ValidationError(#[from] ValidationError),
    #[error("Malformed request body")]
    MalformedBody(#[from] JsonRejection),
    #[error("Malformed task ID")]
    MalformedTaskId(#[from] PathRejection),
    #[error("Malformed query string")]
    MalformedQuery(#[from] QueryRejection),
}

impl From<LedgerStoreError> for LedgerAPIError {
    fn from(error: LedgerStoreError) -> Self {
        match error {
            LedgerStoreError::Lifecycle(e) => Self::LifecycleError(e),
            e => Self::UnexpectedError(eyre!(e)),
        }
    }
}

/// Rule violations raised by the pledge → approve → complete state machine.
///
/// Every variant is raised before any mutation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Creator not found: {0}")]
    CreatorNotFound(MemberId),
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),
    #[error("Invalid task")]
    InvalidTask,
    #[error("Insufficient credits")]
    InsufficientCredits,
    #[error("Only creator can approve")]
    Forbidden,
    #[error("Task must be approved by creator")]
    NotApproved,
    #[error("No pledged credits")]
    NoPledge,
    #[error("Credit balance out of range")]
    CreditOverflow,
}

#[derive(Debug, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: String) -> Self {
        Self(message)
    }

    pub fn as_ref(&self) -> &String {
        &self.0
    }
}
