//! Wallet-facing summary and deposit types.

use crate::DataStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of a wallet's tracked-token holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSummary {
    /// Checksummed wallet address.
    pub address: String,

    /// Tracked token symbol.
    pub token_symbol: String,

    /// Current token balance, decimal-scaled (e.g. "12.500000").
    pub token_balance: String,

    /// Configured unit price in USD.
    pub token_price_usd: f64,

    /// Balance valued at the unit price, rounded to 2 decimals.
    pub token_value_usd: Decimal,

    /// Month and year of the wallet's first on-chain activity, or "—".
    pub joined_at: String,
}

/// One incoming transfer shown in the deposit listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositItem {
    /// Transaction hash.
    pub tx_hash: String,

    /// Sender address.
    pub from: String,

    /// Decimal-scaled amount string.
    pub amount: String,

    /// Token symbol.
    pub symbol: String,

    /// Transfer timestamp in milliseconds since Unix epoch.
    pub timestamp_ms: i64,
}

/// Recent incoming transfers of the tracked token to an address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositInfo {
    /// Checksummed wallet address.
    pub address: String,

    /// Most recent deposits, newest first.
    pub deposits: Vec<DepositItem>,

    /// Outcome classification.
    pub status: DataStatus,

    /// Human-readable detail for `no_history` and `error` outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
