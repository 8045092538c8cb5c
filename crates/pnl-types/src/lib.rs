//! pnl-types: Shared data structures for the ERC-20 PnL ledger
//!
//! This crate defines all shared types used across the workspace including:
//! - [`Ledger`] / [`LedgerEvent`] - A strictly time-ordered, signed sequence
//!   of balance-affecting events with backward replay
//! - [`PnlSeries`] / [`SeriesPoint`] - A step-function PnL series in USD
//! - [`RangeKey`] - The fixed enumeration of lookback windows
//! - [`DataStatus`] - Discriminated outcome of data-producing operations
//!
//! # Example
//!
//! ```rust
//! use alloy::primitives::{I256, U256};
//! use pnl_types::{Ledger, LedgerEvent};
//!
//! let ledger = Ledger::new(vec![LedgerEvent {
//!     timestamp_ms: 1_000,
//!     delta_raw: I256::try_from(500).unwrap(),
//! }]);
//!
//! // Balance before the only deposit is zero
//! let before = ledger.balance_at(U256::from(500u64), 999).unwrap();
//! assert_eq!(before, I256::ZERO);
//! ```

mod error;
mod ledger;
mod money;
mod range;
mod series;
mod time;
mod wallet;

pub use error::TypeError;
pub use ledger::{Ledger, LedgerEvent, WindowReplay};
pub use money::{format_token_amount, round_money, to_usd, to_usd_unsigned, units_to_f64};
pub use range::RangeKey;
pub use series::{DataStatus, PnlSeries, SeriesPoint};
pub use time::{month_year, round_to_minute};
pub use wallet::{DepositInfo, DepositItem, WalletSummary};
