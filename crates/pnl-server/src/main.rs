//! pnl-server: Main binary for the token PnL service.
//!
//! This binary wires together all crates and starts the HTTP server.

use pnl_api::{create_router, AppState};
use pnl_engine::{EngineConfig, PnlEngine};
use pnl_explorer::{EtherscanClient, ExplorerConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default port for the server.
const DEFAULT_PORT: u16 = 3000;

/// Default host for the server.
const DEFAULT_HOST: &str = "0.0.0.0";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pnl_server=info,pnl_api=info,pnl_engine=info,pnl_explorer=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse configuration from environment
    let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let explorer_config = ExplorerConfig::from_env()?;
    let engine_config = EngineConfig::from_env()?;

    tracing::info!(
        "Starting pnl-server on {}:{} (token: {:#x} \"{}\", chain: {})",
        host,
        port,
        engine_config.token,
        engine_config.token_symbol,
        explorer_config.chain_id
    );

    // Wire explorer client and engine
    let client = EtherscanClient::new(explorer_config);
    let engine = PnlEngine::new(client, engine_config);

    // Create app state
    let state = Arc::new(AppState::new(engine));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health         - Health check");
    tracing::info!("  GET  /v1/pnl         - PnL series for a wallet");
    tracing::info!("  GET  /v1/summary     - Wallet summary");
    tracing::info!("  GET  /v1/deposits    - Recent deposits");
    tracing::info!("  POST /v1/invalidate  - Drop cached wallet results");

    axum::serve(listener, app).await?;

    Ok(())
}
