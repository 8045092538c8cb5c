//! Error types for pnl-types.

use thiserror::Error;

/// Errors that can occur when working with types.
#[derive(Debug, Error)]
pub enum TypeError {
    /// Signed 256-bit arithmetic overflowed during balance replay.
    /// Cannot happen for well-formed ERC-20 supplies, but the replay
    /// walks untrusted history so it is reported rather than panicking.
    #[error("balance overflow during ledger replay")]
    BalanceOverflow,
}
