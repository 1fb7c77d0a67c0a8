use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
};
use axum_extra::extract::WithRejection;
use color_eyre::eyre::eyre;
use serde::Deserialize;

use crate::{
    domain::{LedgerAPIError, MemberId, Payout, Snapshot, Task},
    utils::constants::PRESENTER_PLEDGE_AMOUNT,
    AppState,
};

#[derive(Deserialize)]
pub struct BoardQueryParams {
    #[serde(rename = "memberId")]
    member_id: Option<i64>,
}

#[tracing::instrument(name = "Board page route handler", skip_all)]
pub async fn board(
    State(state): State<AppState>,
    WithRejection(query_params, _): WithRejection<
        Query<BoardQueryParams>,
        LedgerAPIError,
    >,
) -> Result<Html<String>, LedgerAPIError> {
    let snapshot = state
        .ledger_store
        .get_snapshot()
        .await
        .map_err(|e| LedgerAPIError::UnexpectedError(eyre!(e)))?;

    let page = BoardTemplate::from_snapshot(
        &snapshot,
        query_params.member_id.map(MemberId::new),
    );
    let html = page
        .render()
        .map_err(|e| LedgerAPIError::UnexpectedError(eyre!(e)))?;

    Ok(Html(html))
}

/// HTML view of a snapshot. The payout shown per task is a projection for
/// display; the completion endpoint recomputes it.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub current_member: Option<MemberView>,
    pub members: Vec<MemberView>,
    pub tasks: Vec<TaskView>,
    pub pledge_amount: i64,
}

pub struct MemberView {
    pub id: i64,
    pub name: String,
    pub credits: i64,
    pub selected: bool,
}

pub struct TaskView {
    pub id: i64,
    pub title: String,
    pub creator_name: String,
    pub pledged_credits: i64,
    pub projected_payout: i64,
    pub approved: bool,
    pub completed: bool,
    pub completed_by_name: String,
}

impl BoardTemplate {
    /// Falls back to the first member when `selected` is absent or unknown.
    pub fn from_snapshot(
        snapshot: &Snapshot,
        selected: Option<MemberId>,
    ) -> Self {
        let selected = selected
            .filter(|id| snapshot.member(id).is_some())
            .or_else(|| snapshot.members.first().map(|member| member.id));

        let members: Vec<MemberView> = snapshot
            .members
            .iter()
            .map(|member| MemberView {
                id: *member.id.as_ref(),
                name: member.name.as_ref().to_owned(),
                credits: member.credits.value_of(),
                selected: Some(member.id) == selected,
            })
            .collect();

        let current_member = members
            .iter()
            .find(|member| member.selected)
            .map(|member| MemberView {
                id: member.id,
                name: member.name.clone(),
                credits: member.credits,
                selected: true,
            });

        Self {
            current_member,
            members,
            tasks: snapshot
                .tasks
                .iter()
                .map(|task| TaskView::new(task, snapshot))
                .collect(),
            pledge_amount: PRESENTER_PLEDGE_AMOUNT,
        }
    }
}

impl TaskView {
    fn new(task: &Task, snapshot: &Snapshot) -> Self {
        let name_of = |id: &MemberId| {
            snapshot
                .member(id)
                .map(|member| member.name.as_ref().to_owned())
                .unwrap_or_else(|| format!("member {id}"))
        };

        Self {
            id: *task.id.as_ref(),
            title: task.title.as_ref().to_owned(),
            creator_name: name_of(&task.creator_id),
            pledged_credits: task.pledged_credits.value_of(),
            projected_payout: Payout::for_pledged(task.pledged_credits)
                .total()
                .value_of(),
            approved: task.approved,
            completed: task.completed,
            completed_by_name: task
                .completed_by
                .as_ref()
                .map(name_of)
                .unwrap_or_default(),
        }
    }
}
