//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod assumptions;
pub mod aum;
pub mod budget_transactions;
pub mod forecast;
pub mod health;
pub mod pin_submissions;
pub mod snapshots;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(assumptions::routes())
        .merge(budget_transactions::routes())
        .merge(pin_submissions::routes())
        .merge(forecast::routes())
        .merge(snapshots::routes())
        .merge(aum::routes())
}
