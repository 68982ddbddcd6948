//! PIN headcount submission routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use zynbudget_core::budget_input::{
    BudgetInputError, CreatePinSubmissionInput, PinDataSubmission, PinHeadcountSummary,
    TransactionStatus,
};
use zynbudget_shared::types::PinSubmissionId;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the PIN submission routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pin-submissions", post(submit_pin_data))
        .route("/pin-submissions/{id}", get(get_submission))
        .route("/pin-submissions/{id}/status", post(update_status))
        .route("/pin-submissions/year/{year}", get(list_submissions))
}

/// Request body for a PIN submission.
#[derive(Debug, Deserialize)]
pub struct SubmitPinDataRequest {
    /// Budget year.
    pub budget_year: i32,
    /// RSA fund key such as `RSA_1`.
    pub fund_selection: String,
    /// Submitting department.
    pub department: String,
    /// Active PINs.
    #[serde(default)]
    pub active_pins: u32,
    /// Non-active PINs.
    #[serde(default)]
    pub non_active_pins: u32,
    /// Never-funded PINs.
    #[serde(default)]
    pub never_funded_pins: u32,
    /// New enrolments.
    #[serde(default)]
    pub new_enrolments: u32,
    /// Average contribution of an existing PIN.
    #[serde(default)]
    pub avg_contribution_existing: Decimal,
    /// Average contribution of a new PIN.
    #[serde(default)]
    pub avg_contribution_new: Decimal,
    /// Submitting user.
    pub submitted_by: String,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct UpdatePinStatusRequest {
    /// Target status.
    pub status: TransactionStatus,
    /// User taking the decision.
    pub decided_by: String,
}

/// Submissions of a budget year with their approved headcounts.
#[derive(Debug, Serialize)]
pub struct PinSubmissionsResponse {
    /// Submissions ordered by department then fund.
    pub submissions: Vec<PinDataSubmission>,
    /// Approved headcounts of the year.
    pub approved: PinHeadcountSummary,
}

/// POST /pin-submissions
async fn submit_pin_data(
    State(state): State<AppState>,
    Json(req): Json<SubmitPinDataRequest>,
) -> ApiResult<impl IntoResponse> {
    let fund = state.funds.resolve_key(&req.fund_selection)?.selection;
    let submission = state.inputs.submit_pin_data(CreatePinSubmissionInput {
        budget_year: req.budget_year,
        fund,
        department: req.department,
        active_pins: req.active_pins,
        non_active_pins: req.non_active_pins,
        never_funded_pins: req.never_funded_pins,
        new_enrolments: req.new_enrolments,
        avg_contribution_existing: req.avg_contribution_existing,
        avg_contribution_new: req.avg_contribution_new,
        submitted_by: req.submitted_by,
    })?;
    Ok((StatusCode::CREATED, Json(submission)))
}

/// GET /pin-submissions/{id}
async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<PinSubmissionId>,
) -> ApiResult<Json<PinDataSubmission>> {
    let submission = state
        .inputs
        .pin_submission(id)
        .ok_or(BudgetInputError::PinSubmissionNotFound(id))?;
    Ok(Json(submission))
}

/// POST /pin-submissions/{id}/status
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<PinSubmissionId>,
    Json(req): Json<UpdatePinStatusRequest>,
) -> ApiResult<Json<PinDataSubmission>> {
    let decided_by = req.decided_by.trim();
    if decided_by.is_empty() {
        return Err(BudgetInputError::MissingField("decided_by").into());
    }

    let submission = state.inputs.set_pin_status(id, req.status, decided_by)?;
    info!(pin_submission_id = %id, status = %submission.status, "PIN submission status changed");
    Ok(Json(submission))
}

/// GET /pin-submissions/year/{year}
async fn list_submissions(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Json<PinSubmissionsResponse> {
    let submissions = state.inputs.pin_submissions(year);
    Json(PinSubmissionsResponse {
        approved: PinHeadcountSummary::from_submissions(year, &submissions),
        submissions,
    })
}
