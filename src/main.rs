use std::sync::Arc;

use anyhow::Context;
use fleet_portal::api::{app, AppState};
use fleet_portal::gateway::HttpGateway;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up GATEWAY_URL, BLOB_READ_WRITE_TOKEN, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = fleet_portal::config::config().clone();
    tracing::info!("Starting fleet portal in {:?} mode", config.environment);
    tracing::debug!("Gateway settings: {:?}", config.gateway);

    if config.gateway.url.is_empty() {
        tracing::warn!("GATEWAY_URL is unset; driver listing and identity checks will degrade");
    }

    let gateway = HttpGateway::new(config.gateway.clone()).context("failed to build gateway client")?;
    let state = AppState::new(Arc::new(gateway), config);

    // Allow tests or deployments to override port via env
    let port = std::env::var("FLEET_PORTAL_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Fleet portal listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
