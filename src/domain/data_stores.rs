use super::{
    ApprovalReceipt, CompletionReceipt, LifecycleError, Member, MemberId,
    PledgeAmount, PledgeReceipt, Snapshot, Task, TaskId, TaskTitle,
};
use color_eyre::eyre::Report;
use thiserror::Error;

/// Persistence for members and tasks.
///
/// Every lifecycle method is atomic: either all of its writes become visible
/// or none do, and concurrent calls touching the same rows are serialised.
#[async_trait::async_trait]
pub trait LedgerStore {
    /// Inserts each member whose id is not yet present. Existing members are
    /// left untouched.
    async fn seed_members(
        &self,
        members: &[Member],
    ) -> Result<(), LedgerStoreError>;
    async fn get_snapshot(&self) -> Result<Snapshot, LedgerStoreError>;
    async fn create_task(
        &self,
        title: &TaskTitle,
        creator_id: &MemberId,
    ) -> Result<Task, LedgerStoreError>;
    async fn pledge(
        &self,
        task_id: &TaskId,
        member_id: &MemberId,
        amount: PledgeAmount,
    ) -> Result<PledgeReceipt, LedgerStoreError>;
    async fn approve(
        &self,
        task_id: &TaskId,
        approver_id: &MemberId,
    ) -> Result<ApprovalReceipt, LedgerStoreError>;
    async fn complete(
        &self,
        task_id: &TaskId,
        member_id: &MemberId,
    ) -> Result<CompletionReceipt, LedgerStoreError>;
}

#[derive(Debug, Error)]
pub enum LedgerStoreError {
    #[error("Lifecycle rule violated")]
    Lifecycle(#[from] LifecycleError),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for LedgerStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Lifecycle(a), Self::Lifecycle(b)) => a == b,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}
