//! Application state for the API server.

use pnl_engine::{HistorySource, PnlEngine};

/// Shared application state.
///
/// Generic over the history source so handler tests can run against a
/// mock source; the server binary instantiates it with the real
/// explorer client.
pub struct AppState<S> {
    /// The engine computing per-wallet results.
    pub engine: PnlEngine<S>,
}

impl<S: HistorySource> AppState<S> {
    /// Create a new application state with the given engine.
    pub fn new(engine: PnlEngine<S>) -> Self {
        Self { engine }
    }
}
