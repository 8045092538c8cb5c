//! Route handlers for the API endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{
    AddressQuery, DepositsResponse, HealthResponse, InvalidateResponse, PnlQuery, PnlResponse,
    SummaryResponse,
};
use pnl_engine::HistorySource;
use pnl_types::RangeKey;

/// Range used when the query omits one.
const DEFAULT_RANGE: RangeKey = RangeKey::D1;

/// GET /health - Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /v1/pnl - PnL series for a wallet over a range.
pub async fn get_pnl<S: HistorySource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<PnlQuery>,
) -> Result<Json<PnlResponse>, ApiError> {
    if query.address.is_empty() {
        return Err(ApiError::BadRequest("address is required".to_string()));
    }

    let range = match &query.range {
        Some(raw) => raw
            .parse::<RangeKey>()
            .map_err(|_| ApiError::BadRequest(format!("unknown range: {raw}")))?,
        None => DEFAULT_RANGE,
    };

    let series = state.engine.get_pnl_series(&query.address, range).await?;

    Ok(Json(PnlResponse::new(query.address, series)))
}

/// GET /v1/summary - Wallet summary for the tracked token.
pub async fn get_summary<S: HistorySource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<AddressQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    if query.address.is_empty() {
        return Err(ApiError::BadRequest("address is required".to_string()));
    }

    let summary = state.engine.get_wallet_summary(&query.address).await?;

    Ok(Json(summary.into()))
}

/// GET /v1/deposits - Recent deposits of the tracked token.
pub async fn get_deposits<S: HistorySource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<AddressQuery>,
) -> Result<Json<DepositsResponse>, ApiError> {
    if query.address.is_empty() {
        return Err(ApiError::BadRequest("address is required".to_string()));
    }

    let info = state.engine.get_deposit_info(&query.address).await?;

    Ok(Json(info.into()))
}

/// POST /v1/invalidate - Drop cached results for a wallet.
///
/// Call after a balance-changing action so the next read recomputes
/// instead of serving a stale series for up to a TTL.
pub async fn invalidate<S: HistorySource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<AddressQuery>,
) -> Result<Json<InvalidateResponse>, ApiError> {
    if query.address.is_empty() {
        return Err(ApiError::BadRequest("address is required".to_string()));
    }

    state.engine.invalidate_wallet(&query.address)?;

    Ok(Json(InvalidateResponse {
        address: query.address,
        invalidated: true,
    }))
}
