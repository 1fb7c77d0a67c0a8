//! Pledge → approve → complete transitions.
//!
//! Each function takes the rows an operation touches, as the store loaded
//! them, and either returns the rows to write back or the rule that was
//! violated. Stores call these while holding their locks, so the checks and
//! the writes form a single atomic step.

use super::{
    ApprovalReceipt, CompletionReceipt, LifecycleError, Member, MemberId,
    Payout, PledgeAmount, PledgeReceipt, Task,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Pledged {
    pub member: Member,
    pub task: Task,
    pub receipt: PledgeReceipt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Approved {
    pub task: Task,
    /// False when the task was already approved and nothing needs writing.
    pub changed: bool,
    pub receipt: ApprovalReceipt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completed {
    pub task: Task,
    pub completer: Member,
    pub payout: Payout,
    pub receipt: CompletionReceipt,
}

pub fn check_creator(
    creator: Option<Member>,
    creator_id: &MemberId,
) -> Result<Member, LifecycleError> {
    creator.ok_or(LifecycleError::CreatorNotFound(*creator_id))
}

/// Moves `amount` from the member's balance onto the task's pledge pool.
///
/// The member is checked before the task: a missing member reports
/// `InsufficientCredits`, like a member who cannot cover the amount.
pub fn pledge(
    member: Option<Member>,
    task: Option<Task>,
    amount: PledgeAmount,
) -> Result<Pledged, LifecycleError> {
    let mut member = member.ok_or(LifecycleError::InsufficientCredits)?;
    let remaining = member
        .credits
        .checked_sub(amount.credits())
        .ok_or(LifecycleError::InsufficientCredits)?;

    let mut task = open_task(task)?;
    task.pledged_credits = task
        .pledged_credits
        .checked_add(amount.credits())
        .ok_or(LifecycleError::CreditOverflow)?;
    member.credits = remaining;

    let receipt = PledgeReceipt {
        task_id: task.id,
        member_id: member.id,
        pledged: amount.credits(),
    };
    Ok(Pledged {
        member,
        task,
        receipt,
    })
}

/// Only the creator may approve. Approving twice is a no-op.
pub fn approve(
    task: Option<Task>,
    approver_id: &MemberId,
) -> Result<Approved, LifecycleError> {
    let mut task = open_task(task)?;
    if &task.creator_id != approver_id {
        return Err(LifecycleError::Forbidden);
    }

    let changed = !task.approved;
    task.approved = true;

    let receipt = ApprovalReceipt {
        task_id: task.id,
        approved: true,
    };
    Ok(Approved {
        task,
        changed,
        receipt,
    })
}

/// Pays the completer `floor(pledged × ratio)` from the pool plus an equal
/// minted match, and closes the task.
///
/// Only the pool share is removed from `pledged_credits`; whatever is left
/// stays on the completed task.
pub fn complete(
    task: Option<Task>,
    member_id: &MemberId,
    completer: Option<Member>,
) -> Result<Completed, LifecycleError> {
    let mut task = open_task(task)?;
    if !task.approved {
        return Err(LifecycleError::NotApproved);
    }
    let mut completer =
        completer.ok_or(LifecycleError::MemberNotFound(*member_id))?;
    if task.pledged_credits.is_zero() {
        return Err(LifecycleError::NoPledge);
    }

    let payout = Payout::for_pledged(task.pledged_credits);
    completer.credits = completer
        .credits
        .checked_add(payout.total())
        .ok_or(LifecycleError::CreditOverflow)?;
    task.pledged_credits = task
        .pledged_credits
        .checked_sub(payout.from_pledge())
        .ok_or(LifecycleError::CreditOverflow)?;
    task.completed = true;
    task.completed_by = Some(completer.id);

    let receipt = CompletionReceipt::new(task.id, &payout, &completer);
    Ok(Completed {
        task,
        completer,
        payout,
        receipt,
    })
}

fn open_task(task: Option<Task>) -> Result<Task, LifecycleError> {
    match task {
        Some(task) if !task.completed => Ok(task),
        _ => Err(LifecycleError::InvalidTask),
    }
}
