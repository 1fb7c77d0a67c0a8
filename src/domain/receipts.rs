use serde::Serialize;

use super::{Credits, Member, MemberId, MemberName, Payout, Task, TaskId};

/// Point-in-time view of every member and task, ordered by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub members: Vec<Member>,
    pub tasks: Vec<Task>,
}

impl Snapshot {
    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|member| &member.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PledgeReceipt {
    #[serde(rename = "taskId")]
    pub task_id: TaskId,
    #[serde(rename = "memberId")]
    pub member_id: MemberId,
    pub pledged: Credits,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalReceipt {
    #[serde(rename = "taskId")]
    pub task_id: TaskId,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionReceipt {
    #[serde(rename = "taskId")]
    pub task_id: TaskId,
    #[serde(rename = "payoutFromPledge")]
    pub payout_from_pledge: Credits,
    #[serde(rename = "mintedMatch")]
    pub minted_match: Credits,
    #[serde(rename = "totalPayout")]
    pub total_payout: Credits,
    #[serde(rename = "completedBy")]
    pub completed_by: MemberName,
}

impl CompletionReceipt {
    pub fn new(task_id: TaskId, payout: &Payout, completer: &Member) -> Self {
        Self {
            task_id,
            payout_from_pledge: payout.from_pledge(),
            minted_match: payout.minted_match(),
            total_payout: payout.total(),
            completed_by: completer.name.clone(),
        }
    }
}
