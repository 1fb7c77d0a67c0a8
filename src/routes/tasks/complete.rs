use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    domain::{CompletionReceipt, LedgerAPIError, MemberId, TaskId},
    AppState,
};

#[tracing::instrument(name = "Complete task route handler", skip_all)]
pub async fn complete(
    State(state): State<AppState>,
    WithRejection(Path(task_id), _): WithRejection<Path<i64>, LedgerAPIError>,
    WithRejection(Json(request), _): WithRejection<
        Json<CompleteRequest>,
        LedgerAPIError,
    >,
) -> Result<(StatusCode, Json<CompletionReceipt>), LedgerAPIError> {
    let task_id = TaskId::new(task_id);
    let member_id = MemberId::new(request.member_id);

    let receipt = state
        .ledger_store
        .complete(&task_id, &member_id)
        .await?;

    tracing::info!(
        task_id = %task_id,
        total_payout = receipt.total_payout.value_of(),
        "Payout issued"
    );

    Ok((StatusCode::OK, Json(receipt)))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct CompleteRequest {
    #[serde(rename = "memberId")]
    pub member_id: i64,
}
