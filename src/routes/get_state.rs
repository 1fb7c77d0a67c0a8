use axum::{extract::State, http::StatusCode, Json};
use color_eyre::eyre::eyre;

use crate::{
    domain::{LedgerAPIError, Snapshot},
    AppState,
};

#[tracing::instrument(name = "Get state route handler", skip_all)]
pub async fn get_state(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Snapshot>), LedgerAPIError> {
    let snapshot = state
        .ledger_store
        .get_snapshot()
        .await
        .map_err(|e| LedgerAPIError::UnexpectedError(eyre!(e)))?;

    tracing::debug!(
        "members: {}, tasks: {}",
        snapshot.members.len(),
        snapshot.tasks.len()
    );

    Ok((StatusCode::OK, Json(snapshot)))
}
