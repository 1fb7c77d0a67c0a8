use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    domain::{LedgerAPIError, MemberId, Task, TaskTitle},
    AppState,
};

#[tracing::instrument(name = "Create task route handler", skip_all)]
pub async fn create_task(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<
        Json<CreateTaskRequest>,
        LedgerAPIError,
    >,
) -> Result<(StatusCode, Json<Task>), LedgerAPIError> {
    let title = TaskTitle::parse(&request.title)?;
    let creator_id = MemberId::new(request.creator_id);

    let task = state
        .ledger_store
        .create_task(&title, &creator_id)
        .await?;

    tracing::info!(task_id = %task.id, creator_id = %creator_id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(rename = "creatorId")]
    pub creator_id: i64,
}
