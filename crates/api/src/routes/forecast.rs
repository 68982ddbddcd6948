//! Forecast run and statement export routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::post,
};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use zynbudget_core::forecast::{
    AnnualForecastSummary, ForecastInputError, ForecastRun, ForecastSeeds,
};
use zynbudget_core::reports::{ReportService, StatementKind};

use crate::AppState;
use crate::error::ApiResult;

/// Decimal places of presented amounts.
const PRESENTATION_DP: u32 = 2;

const INCOMPLETE_WARNING: &str =
    "No approved OPEX for the forecast year; the forecast runs with zero operating expenses";

/// Creates the forecast routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/forecast/run", post(run_forecast))
        .route("/forecast/export/{statement}", post(export_statement))
}

/// Optional overrides for a forecast run.
///
/// Omitted fields fall back to the latest assumptions and configured seeds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunForecastRequest {
    /// Forecast year. Defaults to the year of the latest assumption set.
    #[serde(default)]
    pub forecast_year: Option<i32>,
    /// Opening AUM.
    #[serde(default)]
    pub initial_aum: Option<Decimal>,
    /// Opening cash.
    #[serde(default)]
    pub initial_cash: Option<Decimal>,
    /// Opening retained earnings.
    #[serde(default)]
    pub initial_retained_earnings: Option<Decimal>,
}

impl RunForecastRequest {
    fn seeds(&self, defaults: ForecastSeeds) -> ForecastSeeds {
        ForecastSeeds {
            initial_aum: self.initial_aum.unwrap_or(defaults.initial_aum),
            initial_cash: self.initial_cash.unwrap_or(defaults.initial_cash),
            initial_retained_earnings: self
                .initial_retained_earnings
                .unwrap_or(defaults.initial_retained_earnings),
        }
    }
}

/// Forecast run response.
#[derive(Debug, Serialize)]
pub struct ForecastRunResponse {
    /// The run, rounded for presentation.
    #[serde(flatten)]
    pub run: ForecastRun,
    /// Income statement sums over the year.
    pub annual_totals: AnnualForecastSummary,
    /// Net profit of the last month.
    pub final_net_profit: Decimal,
    /// Closing cash of the last month.
    pub closing_cash_final: Decimal,
    /// Whether every month's balance sheet balances.
    pub is_balanced: bool,
    /// Set when the run used incomplete inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

impl From<&ForecastRun> for ForecastRunResponse {
    fn from(run: &ForecastRun) -> Self {
        Self {
            annual_totals: run.annual_totals().round_dp(PRESENTATION_DP),
            final_net_profit: run.final_net_profit().round_dp(PRESENTATION_DP),
            closing_cash_final: run.closing_cash_final().round_dp(PRESENTATION_DP),
            is_balanced: run.is_balanced(),
            warning: run.incomplete_inputs.then_some(INCOMPLETE_WARNING),
            run: run.round_dp(PRESENTATION_DP),
        }
    }
}

/// Runs the forecast from the latest assumptions and the year's approved totals.
///
/// Amounts in the returned run are unrounded.
pub(crate) fn compute_run(state: &AppState, req: &RunForecastRequest) -> ApiResult<ForecastRun> {
    let seeds = req.seeds(state.seeds);
    seeds.validate()?;

    let assumptions = state
        .inputs
        .latest_assumption()
        .ok_or(ForecastInputError::MissingAssumptions)?;

    let forecast_year = req
        .forecast_year
        .unwrap_or_else(|| assumptions.period_start.year());
    let totals = state.inputs.approved_totals(forecast_year);

    let mut run = state
        .forecast_cache
        .run_cached(&state.engine, &assumptions, &totals, &seeds);
    run.incomplete_inputs = !totals.has_approved_opex();

    if run.incomplete_inputs {
        warn!(
            forecast_year,
            version = %assumptions.version_name,
            "Forecast running without approved OPEX"
        );
    }

    info!(
        forecast_year,
        version = %assumptions.version_name,
        cached = run.cached,
        "Forecast computed"
    );

    Ok(run)
}

/// POST /forecast/run
async fn run_forecast(
    State(state): State<AppState>,
    Json(req): Json<RunForecastRequest>,
) -> ApiResult<Json<ForecastRunResponse>> {
    let run = compute_run(&state, &req)?;
    Ok(Json(ForecastRunResponse::from(&run)))
}

/// POST /forecast/export/{statement}
///
/// Returns one statement as CSV, one column per month.
async fn export_statement(
    State(state): State<AppState>,
    Path(statement): Path<String>,
    Json(req): Json<RunForecastRequest>,
) -> ApiResult<impl IntoResponse> {
    let kind: StatementKind = statement.parse()?;
    let run = compute_run(&state, &req)?;

    let table = ReportService::statement(&run, kind);
    let csv = ReportService::to_csv_string(&table)?;
    let filename = format!(
        "attachment; filename=\"{}_{}.csv\"",
        kind.as_str(),
        run.forecast_year
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        csv,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{body_json, body_text, json_request, state};
    use axum::http::StatusCode;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use tower::ServiceExt;
    use zynbudget_core::budget_input::{
        CreateAssumptionInput, CreateTransactionInput, TransactionKind, TransactionStatus,
    };

    fn seeded_state(approve_opex: bool) -> AppState {
        let state = state();
        let period_start = chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        state
            .inputs
            .save_assumption(CreateAssumptionInput::with_defaults("FY26 Base", period_start))
            .unwrap();

        let line = state
            .inputs
            .submit_transaction(CreateTransactionInput {
                kind: TransactionKind::Opex,
                budget_year: 2026,
                department: "Finance".to_string(),
                gl_account_code: "6100".to_string(),
                description: "Running costs".to_string(),
                annual_amount: dec!(120000000),
                quantity: 1,
                unit_cost: None,
                submitted_by: "budget.officer".to_string(),
            })
            .unwrap();
        if approve_opex {
            state
                .inputs
                .set_transaction_status(line.id, TransactionStatus::Approved)
                .unwrap();
        }
        state
    }

    fn app(state: AppState) -> Router {
        Router::new().merge(routes()).with_state(state)
    }

    #[tokio::test]
    async fn test_run_without_assumptions_is_missing_input() {
        let response = app(state())
            .oneshot(json_request("POST", "/forecast/run", &json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"], "MISSING_INPUT");
    }

    #[tokio::test]
    async fn test_run_returns_rounded_twelve_months() {
        let response = app(seeded_state(true))
            .oneshot(json_request("POST", "/forecast/run", &json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["forecast_year"], 2026);
        assert_eq!(body["assumption_version"], "FY26 Base");
        assert_eq!(body["months"].as_array().unwrap().len(), 12);
        assert_eq!(body["months"][0]["period"], "Jan-26");
        assert_eq!(
            body["months"][0]["income_statement"]["admin_expenses"],
            "10041666.67"
        );
        assert_eq!(body["is_balanced"], true);
        assert!(body.get("warning").is_none());
    }

    #[tokio::test]
    async fn test_run_without_approved_opex_warns() {
        let response = app(seeded_state(false))
            .oneshot(json_request("POST", "/forecast/run", &json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["incomplete_inputs"], true);
        assert!(body["warning"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_second_run_is_served_from_cache() {
        let app = app(seeded_state(true));

        let first = body_json(
            app.clone()
                .oneshot(json_request("POST", "/forecast/run", &json!({})))
                .await
                .unwrap(),
        )
        .await;
        let second = body_json(
            app.oneshot(json_request("POST", "/forecast/run", &json!({})))
                .await
                .unwrap(),
        )
        .await;

        assert_eq!(first["cached"], false);
        assert_eq!(second["cached"], true);
        assert_eq!(first["months"], second["months"]);
    }

    #[tokio::test]
    async fn test_seed_overrides_apply() {
        let response = app(seeded_state(true))
            .oneshot(json_request(
                "POST",
                "/forecast/run",
                &json!({ "initial_aum": "1000000", "forecast_year": 2026 }),
            ))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["months"][0]["opening_aum"], "1000000");
        assert_eq!(body["seeds"]["initial_aum"], "1000000");
    }

    #[tokio::test]
    async fn test_out_of_range_seed_rejected() {
        let response = app(seeded_state(true))
            .oneshot(json_request(
                "POST",
                "/forecast/run",
                &json!({ "initial_cash": "-79228162514264337593543950335" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("initial_cash"));
    }

    #[tokio::test]
    async fn test_export_income_statement_csv() {
        let response = app(seeded_state(true))
            .oneshot(json_request(
                "POST",
                "/forecast/export/income_statement",
                &json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/csv")
        );
        assert!(
            response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .contains("income_statement_2026.csv")
        );

        let text = body_text(response).await;
        let header_line = text.lines().next().unwrap();
        assert!(header_line.starts_with("Description,Jan-26"));
        assert!(header_line.ends_with("Dec-26"));
    }

    #[tokio::test]
    async fn test_export_unknown_statement_is_not_found() {
        let response = app(seeded_state(true))
            .oneshot(json_request("POST", "/forecast/export/ledger", &json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
