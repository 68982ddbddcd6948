//! Forecast snapshot submission and approval routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use zynbudget_core::snapshot::{
    ForecastSnapshot, SnapshotDecision, SnapshotSummary, StagingRow,
};
use zynbudget_shared::ForecastSubmissionNotice;
use zynbudget_shared::types::{PageRequest, PageResponse, SnapshotId};

use super::forecast::{RunForecastRequest, compute_run};
use crate::AppState;
use crate::error::ApiResult;

/// Creates the snapshot routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/forecast/snapshots", post(submit_snapshot).get(list_snapshots))
        .route("/forecast/snapshots/{id}", get(get_snapshot))
        .route("/forecast/snapshots/{id}/decision", post(decide_snapshot))
}

/// Request body for a snapshot submission.
///
/// The forecast is recomputed server-side from the same overrides a run accepts.
#[derive(Debug, Deserialize)]
pub struct SubmitSnapshotRequest {
    /// Unique version name.
    pub version_name: String,
    /// Submitting user.
    pub submitted_by: String,
    /// Forecast overrides.
    #[serde(flatten)]
    pub forecast: RunForecastRequest,
}

/// Request body for an approval decision.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// Approve or reject.
    pub decision: SnapshotDecision,
    /// Approver.
    pub decided_by: String,
}

/// A snapshot with its GL staging rows.
#[derive(Debug, Serialize)]
pub struct SnapshotDetailResponse {
    /// The snapshot.
    #[serde(flatten)]
    pub snapshot: ForecastSnapshot,
    /// Staging rows in month order.
    pub staging_rows: Vec<StagingRow>,
}

/// POST /forecast/snapshots
async fn submit_snapshot(
    State(state): State<AppState>,
    Json(req): Json<SubmitSnapshotRequest>,
) -> ApiResult<impl IntoResponse> {
    let run = compute_run(&state, &req.forecast)?;
    let snapshot = state
        .snapshots
        .submit(&run, &req.version_name, &req.submitted_by)?;

    let notice = ForecastSubmissionNotice {
        snapshot_id: snapshot.id.to_string(),
        version_name: snapshot.version_name.clone(),
        forecast_year: snapshot.forecast_year,
        submitted_by: snapshot.submitted_by.clone(),
        final_net_profit: snapshot.final_net_profit,
        final_closing_cash: snapshot.final_closing_cash,
    };
    if let Err(e) = state.email_service.send_submission_notice(&notice).await {
        warn!(error = %e, snapshot_id = %snapshot.id, "Failed to send approval notice");
    }

    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /forecast/snapshots
async fn list_snapshots(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Json<PageResponse<SnapshotSummary>> {
    Json(state.snapshots.list(&page))
}

/// GET /forecast/snapshots/{id}
async fn get_snapshot(
    State(state): State<AppState>,
    Path(id): Path<SnapshotId>,
) -> ApiResult<Json<SnapshotDetailResponse>> {
    let snapshot = state.snapshots.get(id)?;
    let staging_rows = state.snapshots.staging_rows(id)?;
    Ok(Json(SnapshotDetailResponse {
        snapshot,
        staging_rows,
    }))
}

/// POST /forecast/snapshots/{id}/decision
async fn decide_snapshot(
    State(state): State<AppState>,
    Path(id): Path<SnapshotId>,
    Json(req): Json<DecisionRequest>,
) -> ApiResult<Json<ForecastSnapshot>> {
    let snapshot = state.snapshots.decide(id, req.decision, &req.decided_by)?;
    Ok(Json(snapshot))
}
