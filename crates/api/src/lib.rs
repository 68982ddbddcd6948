//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes
//! - Shared application state
//! - Error to JSON response mapping

pub mod error;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use zynbudget_core::aum::FundDirectory;
use zynbudget_core::budget_input::{BudgetInputStore, InMemoryBudgetInputStore};
use zynbudget_core::forecast::{ForecastCache, ForecastEngine, ForecastPolicy, ForecastSeeds};
use zynbudget_core::snapshot::{InMemorySnapshotStore, SnapshotStore};
use zynbudget_shared::{AppConfig, AppResult, EmailService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Assumption sets and budget lines.
    pub inputs: Arc<dyn BudgetInputStore>,
    /// Submitted forecast snapshots.
    pub snapshots: Arc<dyn SnapshotStore>,
    /// Forecast engine configured with the house policy.
    pub engine: ForecastEngine,
    /// Default opening balances.
    pub seeds: ForecastSeeds,
    /// Cache of recent forecast runs.
    pub forecast_cache: ForecastCache,
    /// Funds available to the AUM roll-forward.
    pub funds: Arc<FundDirectory>,
    /// Email service for approval notifications.
    pub email_service: Arc<EmailService>,
}

impl AppState {
    /// Builds in-memory state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the forecast policy or seeds in the configuration
    /// are invalid.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let policy = ForecastPolicy::from_config(&config.forecast)?;
        let seeds = ForecastSeeds::from_config(&config.forecast);
        seeds.validate()?;

        Ok(Self {
            inputs: Arc::new(InMemoryBudgetInputStore::new()),
            snapshots: Arc::new(InMemorySnapshotStore::from_config(&config.ledger)),
            engine: ForecastEngine::new(policy),
            seeds,
            forecast_cache: ForecastCache::with_config(
                config.forecast.cache_capacity,
                config.forecast.cache_ttl_secs,
            ),
            funds: Arc::new(FundDirectory::from_config(&config.funds)),
            email_service: Arc::new(EmailService::new(config.email.clone())),
        })
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::AppState;
    use axum::body::Body;
    use axum::http::{Request, Response};
    use http_body_util::BodyExt;
    use zynbudget_shared::AppConfig;
    use zynbudget_shared::config::{FundEntry, FundsConfig};

    /// State with default config and a small fund directory.
    pub fn state() -> AppState {
        let config = AppConfig {
            funds: FundsConfig {
                rsa: vec![FundEntry {
                    id: 1,
                    name: "RSA Fund I".to_string(),
                }],
                managed: vec![FundEntry {
                    id: 1,
                    name: "CBN Retiree".to_string(),
                }],
            },
            ..AppConfig::default()
        };
        AppState::from_config(&config).unwrap()
    }

    /// JSON request builder.
    pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Empty-bodied request builder.
    pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    /// Collects a response body as JSON.
    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Collects a response body as text.
    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}
