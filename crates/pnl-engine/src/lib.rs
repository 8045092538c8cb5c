//! PnL reconstruction engine.
//!
//! This crate turns raw explorer history into per-wallet results:
//!
//! - [`build_ledger`]: normalize raw transfer records into a signed-delta
//!   ledger with strictly increasing timestamps
//! - [`build_series`]: replay balances backward from the live balance and
//!   assemble the step-function USD series for a window
//! - [`PnlEngine`]: the orchestrator tying source, ledger, series and the
//!   read-through TTL cache together
//!
//! # Architecture
//!
//! ```text
//! HistorySource ──> fetch_history ──> build_ledger ──> build_series
//!                                            │
//!                        MemoCache <── PnlEngine (per-wallet keys, TTL)
//! ```
//!
//! Balances are replayed in raw token units with exact 256-bit integer
//! arithmetic; conversion to USD happens exactly once, at presentation.

pub mod builder;
pub mod cache;
pub mod engine;
pub mod error;
pub mod series;

pub use builder::build_ledger;
pub use cache::{Clock, ManualClock, MemoCache, SystemClock};
pub use engine::{EngineConfig, PnlEngine};
pub use error::EngineError;
pub use series::build_series;

// Commonly used types from the layers below, re-exported so engine
// consumers rarely need to depend on them directly.
pub use pnl_explorer::{EtherscanClient, ExplorerConfig, ExplorerError, HistorySource};
pub use pnl_types::{
    DataStatus, DepositInfo, DepositItem, Ledger, LedgerEvent, PnlSeries, RangeKey, SeriesPoint,
    WalletSummary,
};
