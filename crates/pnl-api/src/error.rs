//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pnl_engine::EngineError;
use serde::Serialize;
use thiserror::Error;

/// API errors that can be returned to clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Error from the engine layer.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone())),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            // A malformed address is the caller's fault; anything else the
            // engine surfaces as a hard error is ours.
            ApiError::Engine(EngineError::InvalidAddress(addr)) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                Some(format!("invalid address: {addr}")),
            ),
            ApiError::Engine(e) => {
                tracing::error!("Engine error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "engine_error",
                    Some(e.to_string()),
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
