//! API request and response types.

use pnl_types::{DataStatus, DepositInfo, DepositItem, PnlSeries, RangeKey, SeriesPoint, WalletSummary};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Query parameters for the PnL series endpoint.
#[derive(Debug, Deserialize)]
pub struct PnlQuery {
    /// Wallet address (required).
    pub address: String,
    /// Time range key (e.g., "1H", "1D", "ALL"). Defaults to "1D".
    pub range: Option<String>,
}

/// Query parameters for endpoints keyed by address only.
#[derive(Debug, Deserialize)]
pub struct AddressQuery {
    /// Wallet address (required).
    pub address: String,
}

/// PnL series response.
#[derive(Debug, Serialize)]
pub struct PnlResponse {
    /// Wallet address as requested.
    pub address: String,
    /// Time range the series covers.
    pub range: RangeKey,
    /// Step-function series points, oldest first.
    pub points: Vec<SeriesPoint>,
    /// Last value minus first value, in USD.
    pub delta: Decimal,
    /// Whether the series is usable.
    pub status: DataStatus,
    /// Caller-facing detail for non-ok statuses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PnlResponse {
    pub fn new(address: String, series: PnlSeries) -> Self {
        Self {
            address,
            range: series.range,
            points: series.points,
            delta: series.delta,
            status: series.status,
            message: series.message,
        }
    }
}

/// Wallet summary response.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Checksummed wallet address.
    pub address: String,
    /// Tracked token symbol.
    pub token_symbol: String,
    /// Current balance in whole-token units.
    pub token_balance: String,
    /// Unit price applied.
    pub token_price_usd: f64,
    /// Balance valued in USD, rounded to cents.
    pub token_value_usd: Decimal,
    /// Month and year of the wallet's first transaction, or "—".
    pub joined_at: String,
}

impl From<WalletSummary> for SummaryResponse {
    fn from(summary: WalletSummary) -> Self {
        Self {
            address: summary.address,
            token_symbol: summary.token_symbol,
            token_balance: summary.token_balance,
            token_price_usd: summary.token_price_usd,
            token_value_usd: summary.token_value_usd,
            joined_at: summary.joined_at,
        }
    }
}

/// One deposit in the listing response.
#[derive(Debug, Serialize)]
pub struct DepositResponse {
    /// Transaction hash.
    pub tx_hash: String,
    /// Sender address.
    pub from: String,
    /// Amount in whole-token units.
    pub amount: String,
    /// Token symbol.
    pub symbol: String,
    /// Transfer timestamp (milliseconds since epoch).
    pub timestamp_ms: i64,
}

impl From<DepositItem> for DepositResponse {
    fn from(item: DepositItem) -> Self {
        Self {
            tx_hash: item.tx_hash,
            from: item.from,
            amount: item.amount,
            symbol: item.symbol,
            timestamp_ms: item.timestamp_ms,
        }
    }
}

/// Deposit listing response.
#[derive(Debug, Serialize)]
pub struct DepositsResponse {
    /// Checksummed wallet address.
    pub address: String,
    /// Recent deposits, newest first.
    pub deposits: Vec<DepositResponse>,
    /// Whether the listing is usable.
    pub status: DataStatus,
    /// Caller-facing detail for non-ok statuses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<DepositInfo> for DepositsResponse {
    fn from(info: DepositInfo) -> Self {
        Self {
            address: info.address,
            deposits: info.deposits.into_iter().map(Into::into).collect(),
            status: info.status,
            message: info.message,
        }
    }
}

/// Cache invalidation response.
#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    /// Wallet address whose cached results were dropped.
    pub address: String,
    /// Always true when the call succeeds.
    pub invalidated: bool,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}
