//! Error types for the engine.

use thiserror::Error;

/// Errors that can cross the engine boundary.
///
/// Almost everything that goes wrong during reconstruction is reported
/// inside the result payload (`status = error` / `no_history`) so callers
/// can render it; this enum only carries failures that prevent producing
/// a payload at all.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller-supplied wallet address does not parse. Rejected before
    /// any I/O.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Error from the explorer layer on an operation without a
    /// status-carrying payload (e.g. the live balance read in a summary).
    #[error("explorer error: {0}")]
    Explorer(#[from] pnl_explorer::ExplorerError),

    /// Configuration errors (e.g., missing env vars).
    #[error("config error: {0}")]
    Config(String),
}
