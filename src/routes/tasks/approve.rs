use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    domain::{ApprovalReceipt, LedgerAPIError, MemberId, TaskId},
    AppState,
};

#[tracing::instrument(name = "Approve task route handler", skip_all)]
pub async fn approve(
    State(state): State<AppState>,
    WithRejection(Path(task_id), _): WithRejection<Path<i64>, LedgerAPIError>,
    WithRejection(Json(request), _): WithRejection<
        Json<ApproveRequest>,
        LedgerAPIError,
    >,
) -> Result<(StatusCode, Json<ApprovalReceipt>), LedgerAPIError> {
    let task_id = TaskId::new(task_id);
    let approver_id = MemberId::new(request.approver_id);

    let receipt = state
        .ledger_store
        .approve(&task_id, &approver_id)
        .await?;

    Ok((StatusCode::OK, Json(receipt)))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct ApproveRequest {
    #[serde(rename = "approverId")]
    pub approver_id: i64,
}
