//! OPEX/CAPEX budget line routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use zynbudget_core::budget_input::{
    ApprovedExpenseTotals, BudgetInputError, BudgetTransaction, CreateTransactionInput,
    TransactionStatus,
};
use zynbudget_shared::types::BudgetTransactionId;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the budget line routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budget-transactions", post(submit_transaction))
        .route("/budget-transactions/{id}", get(get_transaction))
        .route("/budget-transactions/{id}/status", post(update_status))
        .route("/budget-transactions/totals/{year}", get(approved_totals))
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status.
    pub status: TransactionStatus,
}

/// Approved totals of a budget year.
#[derive(Debug, Serialize)]
pub struct ApprovedTotalsResponse {
    /// Summed approved lines.
    #[serde(flatten)]
    pub totals: ApprovedExpenseTotals,
    /// False when a forecast for this year would run without OPEX.
    pub has_approved_opex: bool,
}

/// POST /budget-transactions
async fn submit_transaction(
    State(state): State<AppState>,
    Json(input): Json<CreateTransactionInput>,
) -> ApiResult<impl IntoResponse> {
    let transaction = state.inputs.submit_transaction(input)?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET /budget-transactions/{id}
async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<BudgetTransactionId>,
) -> ApiResult<Json<BudgetTransaction>> {
    let transaction = state
        .inputs
        .transaction(id)
        .ok_or(BudgetInputError::TransactionNotFound(id))?;
    Ok(Json(transaction))
}

/// POST /budget-transactions/{id}/status
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<BudgetTransactionId>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<BudgetTransaction>> {
    let transaction = state.inputs.set_transaction_status(id, req.status)?;

    // Approved totals feed the forecast.
    state.forecast_cache.invalidate_all();
    info!(transaction_id = %id, status = %transaction.status, "Budget line status changed");

    Ok(Json(transaction))
}

/// GET /budget-transactions/totals/{year}
async fn approved_totals(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Json<ApprovedTotalsResponse> {
    let totals = state.inputs.approved_totals(year);
    Json(ApprovedTotalsResponse {
        has_approved_opex: totals.has_approved_opex(),
        totals,
    })
}
