//! AUM roll-forward routes.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::debug;
use zynbudget_core::aum::{AumRollForward, AumRollForwardInput, AumRollForwardResult, Fund};

use crate::AppState;
use crate::error::ApiResult;

/// Decimal places of the returned percentages.
const PERCENT_DP: u32 = 2;

/// Creates the AUM routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/aum/funds", get(list_funds))
        .route("/aum/roll-forward", post(roll_forward))
        .route("/aum/roll-forward/batch", post(roll_forward_batch))
}

/// Request body for a single roll-forward.
#[derive(Debug, Deserialize)]
pub struct RollForwardRequest {
    /// Fund key such as `RSA_1`. Without one the figures are computed unattached.
    #[serde(default)]
    pub fund_selection: Option<String>,
    /// Period drivers.
    #[serde(flatten)]
    pub input: AumRollForwardInput,
}

/// One fund of a batch roll-forward.
#[derive(Debug, Deserialize)]
pub struct BatchItem {
    /// Fund key such as `MAN_2`.
    pub fund_selection: String,
    /// Period drivers.
    #[serde(flatten)]
    pub input: AumRollForwardInput,
}

/// Request body for a batch roll-forward.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    /// Funds to compute, returned in the same order.
    pub items: Vec<BatchItem>,
}

fn present(result: AumRollForwardResult) -> AumRollForwardResult {
    AumRollForwardResult {
        aum_growth_percent: result.aum_growth_percent.round_dp(PERCENT_DP),
        net_flow_percent: result.net_flow_percent.round_dp(PERCENT_DP),
        return_on_asset_percent: result.return_on_asset_percent.round_dp(PERCENT_DP),
        ..result
    }
}

/// GET /aum/funds
async fn list_funds(State(state): State<AppState>) -> Json<Vec<Fund>> {
    Json(state.funds.list().into_iter().cloned().collect())
}

/// POST /aum/roll-forward
async fn roll_forward(
    State(state): State<AppState>,
    Json(req): Json<RollForwardRequest>,
) -> ApiResult<Json<AumRollForwardResult>> {
    req.input.validate()?;
    let result = match req.fund_selection.as_deref() {
        Some(key) => {
            let fund = state.funds.resolve_key(key)?;
            AumRollForward::compute_for(fund, &req.input)
        }
        None => AumRollForward::compute(&req.input),
    };
    Ok(Json(present(result)))
}

/// POST /aum/roll-forward/batch
async fn roll_forward_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> ApiResult<Json<Vec<AumRollForwardResult>>> {
    let inputs = req
        .items
        .into_iter()
        .map(|item| -> ApiResult<(Fund, AumRollForwardInput)> {
            item.input.validate()?;
            let fund = state.funds.resolve_key(&item.fund_selection)?.clone();
            Ok((fund, item.input))
        })
        .collect::<ApiResult<Vec<_>>>()?;

    debug!(funds = inputs.len(), "Batch AUM roll-forward");
    let results = AumRollForward::compute_batch(&inputs)
        .into_iter()
        .map(present)
        .collect();
    Ok(Json(results))
}
