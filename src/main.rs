//! vibe-gateway server entry point.
//!
//! Loads configuration, connects the store and the inference client, and
//! serves the REST API.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use vibe_gateway::api;
use vibe_gateway::app_state::{AppState, ServiceSettings};
use vibe_gateway::config::GatewayConfig;
use vibe_gateway::inference::GeminiClient;
use vibe_gateway::persistence;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(addr = %config.listen_addr, "starting vibe-gateway");
    for key in config.missing_credentials() {
        tracing::warn!(key, "credential not configured; dependent requests will fail");
    }

    // Build store and inference client
    let store = persistence::connect(&config)
        .await
        .context("failed to set up the event store")?;
    let inference = GeminiClient::new(
        config.gemini_api_key.clone(),
        &config.gemini_api_base,
        config.model_attempt_timeout(),
    )
    .context("failed to build the inference client")?;
    tracing::info!(candidates = ?config.model_candidates, "model fallback order");

    // Build application state and router
    let state = AppState::new(store, Arc::new(inference), &ServiceSettings::from(&config));
    let app = api::build_app(state, config.max_upload_bytes);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
