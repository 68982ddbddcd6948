//! ZynBudget API Server
//!
//! Main entry point for the forecast budgeting service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zynbudget_api::{AppState, create_router};
use zynbudget_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zynbudget=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    info!(
        tax_rate = %config.forecast.tax_rate,
        balance_treatment = %config.forecast.balance_treatment,
        "Forecast policy configured"
    );
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        enabled = config.email.enabled,
        "Email service configured"
    );

    // Create application state
    let state = AppState::from_config(&config).context("Invalid forecast configuration")?;
    info!(funds = state.funds.len(), "Fund directory loaded");

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
