//! Error types for the explorer layer.
//!
//! We use a simple enum with `thiserror` for ergonomic error handling.
//! External errors are converted into owned strings immediately, avoiding
//! generic parameters and boxed trait objects on the error type.

use thiserror::Error;

/// Errors that can occur while talking to the block-explorer API.
///
/// Rate limits and authentication failures are distinguishable kinds so
/// callers can decide whether to report them or fail hard; everything the
/// explorer reports that we don't recognize lands in [`ExplorerError::Api`]
/// with the raw message.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// The explorer rejected our API key.
    #[error("invalid explorer API key")]
    InvalidApiKey,

    /// The explorer's request rate limit was reached.
    #[error("explorer rate limit reached, retry in a few seconds")]
    RateLimit,

    /// Non-success HTTP status from the explorer.
    #[error("explorer HTTP status {0}")]
    Http(u16),

    /// Transport-level failure (DNS, TLS, timeouts, malformed body).
    #[error("network error: {0}")]
    Network(String),

    /// An explorer-reported error we don't specifically recognize.
    #[error("explorer error: {0}")]
    Api(String),

    /// Configuration errors (e.g., missing env vars).
    #[error("config error: {0}")]
    Config(String),

    /// Invalid address passed to a query.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

// Convert from reqwest::Error to our error type. The message is extracted
// immediately so the variant stays an owned string.
impl From<reqwest::Error> for ExplorerError {
    #[inline]
    fn from(err: reqwest::Error) -> Self {
        ExplorerError::Network(err.to_string())
    }
}
