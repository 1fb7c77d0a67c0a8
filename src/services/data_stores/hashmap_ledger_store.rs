use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::domain::{
    lifecycle, ApprovalReceipt, CompletionReceipt, LedgerStore,
    LedgerStoreError, Member, MemberId, PledgeAmount, PledgeReceipt, Snapshot,
    Task, TaskId, TaskTitle,
};

/// In-memory ledger. A single lock guards all state; each operation holds
/// the write lock across its whole read-check-write step.
#[derive(Default)]
pub struct HashmapLedgerStore {
    state: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    members: BTreeMap<MemberId, Member>,
    tasks: BTreeMap<TaskId, Task>,
    last_task_id: i64,
}

impl HashmapLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl LedgerStore for HashmapLedgerStore {
    async fn seed_members(
        &self,
        members: &[Member],
    ) -> Result<(), LedgerStoreError> {
        let mut state = self.state.write().await;
        for member in members {
            state
                .members
                .entry(member.id)
                .or_insert_with(|| member.clone());
        }
        Ok(())
    }

    async fn get_snapshot(&self) -> Result<Snapshot, LedgerStoreError> {
        let state = self.state.read().await;
        Ok(Snapshot {
            members: state.members.values().cloned().collect(),
            tasks: state.tasks.values().cloned().collect(),
        })
    }

    async fn create_task(
        &self,
        title: &TaskTitle,
        creator_id: &MemberId,
    ) -> Result<Task, LedgerStoreError> {
        let mut state = self.state.write().await;
        let creator = state.members.get(creator_id).cloned();
        lifecycle::check_creator(creator, creator_id)?;

        state.last_task_id += 1;
        let task = Task::new(
            TaskId::new(state.last_task_id),
            title.clone(),
            *creator_id,
        );
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn pledge(
        &self,
        task_id: &TaskId,
        member_id: &MemberId,
        amount: PledgeAmount,
    ) -> Result<PledgeReceipt, LedgerStoreError> {
        let mut state = self.state.write().await;
        let member = state.members.get(member_id).cloned();
        let task = state.tasks.get(task_id).cloned();

        let pledged = lifecycle::pledge(member, task, amount)?;

        state.members.insert(pledged.member.id, pledged.member);
        state.tasks.insert(pledged.task.id, pledged.task);
        Ok(pledged.receipt)
    }

    async fn approve(
        &self,
        task_id: &TaskId,
        approver_id: &MemberId,
    ) -> Result<ApprovalReceipt, LedgerStoreError> {
        let mut state = self.state.write().await;
        let task = state.tasks.get(task_id).cloned();

        let approved = lifecycle::approve(task, approver_id)?;

        if approved.changed {
            state.tasks.insert(approved.task.id, approved.task);
        }
        Ok(approved.receipt)
    }

    async fn complete(
        &self,
        task_id: &TaskId,
        member_id: &MemberId,
    ) -> Result<CompletionReceipt, LedgerStoreError> {
        let mut state = self.state.write().await;
        let task = state.tasks.get(task_id).cloned();
        let completer = state.members.get(member_id).cloned();

        let completed = lifecycle::complete(task, member_id, completer)?;

        state.members.insert(completed.completer.id, completed.completer);
        state.tasks.insert(completed.task.id, completed.task);
        Ok(completed.receipt)
    }
}
