use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    domain::{LedgerAPIError, MemberId, PledgeAmount, PledgeReceipt, TaskId},
    AppState,
};

#[tracing::instrument(name = "Pledge route handler", skip_all)]
pub async fn pledge(
    State(state): State<AppState>,
    WithRejection(Path(task_id), _): WithRejection<Path<i64>, LedgerAPIError>,
    WithRejection(Json(request), _): WithRejection<
        Json<PledgeRequest>,
        LedgerAPIError,
    >,
) -> Result<(StatusCode, Json<PledgeReceipt>), LedgerAPIError> {
    // Unknown or non-positive ids are reported by the lifecycle checks.
    let task_id = TaskId::new(task_id);
    let member_id = MemberId::new(request.member_id);
    let amount = PledgeAmount::parse(request.amount)?;

    let receipt = state
        .ledger_store
        .pledge(&task_id, &member_id, amount)
        .await?;

    Ok((StatusCode::OK, Json(receipt)))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct PledgeRequest {
    #[serde(rename = "memberId")]
    pub member_id: i64,
    pub amount: i64,
}
