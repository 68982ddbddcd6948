//! Budget assumption routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use tracing::info;
use zynbudget_core::budget_input::{CreateAssumptionInput, RateAssumptionSet};

use crate::AppState;
use crate::error::ApiResult;

/// Creates the assumption routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/assumptions", post(create_assumption).get(list_assumptions))
}

/// POST /assumptions
async fn create_assumption(
    State(state): State<AppState>,
    Json(input): Json<CreateAssumptionInput>,
) -> ApiResult<impl IntoResponse> {
    let set = state.inputs.save_assumption(input)?;
    info!(version = %set.version_name, "Budget assumptions saved");
    Ok((StatusCode::CREATED, Json(set)))
}

/// GET /assumptions
///
/// Newest first; the first entry is what the forecast uses.
async fn list_assumptions(State(state): State<AppState>) -> Json<Vec<RateAssumptionSet>> {
    Json(state.inputs.assumptions_by_recency())
}
