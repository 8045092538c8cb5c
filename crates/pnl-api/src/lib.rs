//! pnl-api: HTTP API layer for the token PnL service.
//!
//! This crate defines the REST endpoints:
//! - GET /health - Health check
//! - GET /v1/pnl - PnL series for a wallet over a range
//! - GET /v1/summary - Wallet summary for the tracked token
//! - GET /v1/deposits - Recent deposits of the tracked token
//! - POST /v1/invalidate - Drop cached results for a wallet

pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use pnl_engine::HistorySource;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router over the given state.
pub fn create_router<S: HistorySource + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/pnl", get(handlers::get_pnl::<S>))
        .route("/v1/summary", get(handlers::get_summary::<S>))
        .route("/v1/deposits", get(handlers::get_deposits::<S>))
        .route("/v1/invalidate", post(handlers::invalidate::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
