//! Core reconstruction engine.
//!
//! [`PnlEngine`] is the main entry point: it fetches history through a
//! [`HistorySource`], builds the ledger, replays balances and assembles
//! the series, with every public operation wrapped in the read-through
//! TTL cache.

use crate::builder::build_ledger;
use crate::cache::{Clock, MemoCache, SystemClock};
use crate::error::EngineError;
use crate::series::build_series;
use alloy::primitives::Address;
use pnl_explorer::{fetch_history, HistorySource, SortOrder};
use pnl_types::{
    format_token_amount, month_year, round_to_minute, to_usd_unsigned, DataStatus, DepositInfo,
    DepositItem, PnlSeries, RangeKey, WalletSummary,
};
use std::env;
use std::sync::Arc;

/// Records per history page.
const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Page budget per history fetch. Bounds total cost for addresses with
/// very long histories; hitting it makes the range query fail loudly
/// instead of answering from truncated data.
const DEFAULT_MAX_PAGES: u32 = 40;

/// Per-entry cache TTL.
const DEFAULT_CACHE_TTL_MS: i64 = 60_000;

/// Transfers fetched when listing deposits.
const DEPOSIT_FETCH_SIZE: u32 = 40;

/// Deposits shown in the listing.
const MAX_DEPOSITS: usize = 8;

/// Configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Contract address of the tracked token.
    pub token: Address,

    /// Display symbol of the tracked token.
    pub token_symbol: String,

    /// Decimal places of the tracked token.
    pub token_decimals: u8,

    /// Current unit price in USD. A single point-in-time value applied
    /// to every series point; the series is a proxy PnL, not a priced
    /// historical valuation.
    pub token_price_usd: f64,

    /// Records per history page.
    pub page_size: u32,

    /// Page budget per history fetch.
    pub max_pages: u32,

    /// Cache TTL for every engine operation.
    pub cache_ttl_ms: i64,
}

impl EngineConfig {
    /// Create a config with default limits.
    pub fn new(
        token: Address,
        token_symbol: impl Into<String>,
        token_decimals: u8,
        token_price_usd: f64,
    ) -> Self {
        Self {
            token,
            token_symbol: token_symbol.into(),
            token_decimals,
            token_price_usd,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
        }
    }

    /// Load the tracked-token settings from environment variables.
    ///
    /// `TRACKED_TOKEN_ADDRESS` is required; symbol, decimals and price
    /// fall back to "TOKEN", 18 and 1.0 respectively.
    pub fn from_env() -> Result<Self, EngineError> {
        let token_raw = env::var("TRACKED_TOKEN_ADDRESS")
            .map_err(|_| EngineError::Config("missing env TRACKED_TOKEN_ADDRESS".to_string()))?;
        let token: Address = token_raw
            .trim()
            .parse()
            .map_err(|_| EngineError::Config(format!("invalid TRACKED_TOKEN_ADDRESS: {token_raw}")))?;

        let token_symbol = env::var("TRACKED_TOKEN_SYMBOL").unwrap_or_else(|_| "TOKEN".to_string());

        let token_decimals = match env::var("TRACKED_TOKEN_DECIMALS") {
            Ok(raw) => raw.parse::<u8>().ok().filter(|d| *d <= 36).ok_or_else(|| {
                EngineError::Config(format!("invalid TRACKED_TOKEN_DECIMALS: {raw}"))
            })?,
            Err(_) => 18,
        };

        let token_price_usd = match env::var("TRACKED_TOKEN_PRICE_USD") {
            Ok(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite() && *p >= 0.0)
                .ok_or_else(|| {
                    EngineError::Config(format!("invalid TRACKED_TOKEN_PRICE_USD: {raw}"))
                })?,
            Err(_) => 1.0,
        };

        Ok(Self::new(token, token_symbol, token_decimals, token_price_usd))
    }

    /// Override the page budget (builder pattern).
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Override the page size (builder pattern).
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Override the cache TTL (builder pattern).
    pub fn with_cache_ttl_ms(mut self, ttl_ms: i64) -> Self {
        self.cache_ttl_ms = ttl_ms;
        self
    }
}

/// The reconstruction engine for one tracked token.
///
/// # Example
///
/// ```rust,no_run
/// use pnl_engine::{EngineConfig, PnlEngine};
/// use pnl_explorer::{EtherscanClient, ExplorerConfig};
/// use pnl_types::RangeKey;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let source = EtherscanClient::new(ExplorerConfig::new("YourApiKey"));
///     let config = EngineConfig::new(
///         "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".parse()?,
///         "USDC",
///         6,
///         1.0,
///     );
///     let engine = PnlEngine::new(source, config);
///
///     let series = engine
///         .get_pnl_series("0x55fe002aeff02f77364de339a1292923a15844b8", RangeKey::W1)
///         .await?;
///     println!("{} points, delta {}", series.points.len(), series.delta);
///     Ok(())
/// }
/// ```
pub struct PnlEngine<S> {
    source: S,
    cache: MemoCache,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl<S: HistorySource> PnlEngine<S> {
    /// Create an engine on the system clock.
    pub fn new(source: S, config: EngineConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    /// Create an engine with an injected clock. The same clock drives
    /// series end times and cache expiry, so tests are deterministic.
    pub fn with_clock(source: S, config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            cache: MemoCache::new(clock.clone()),
            clock,
            config,
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute (or serve cached) the PnL series for one address and range.
    ///
    /// Source failures and unanswerable ranges are reported in the
    /// series' `status`, not as errors; only address validation fails
    /// the call itself.
    pub async fn get_pnl_series(
        &self,
        address: &str,
        range: RangeKey,
    ) -> Result<PnlSeries, EngineError> {
        let wallet = parse_address(address)?;
        let key = format!("pnl:{:#x}:{:#x}:{}", wallet, self.config.token, range);

        self.cache
            .get_or_try_compute(&key, self.config.cache_ttl_ms, || {
                self.compute_pnl_series(wallet, range)
            })
            .await
    }

    async fn compute_pnl_series(
        &self,
        wallet: Address,
        range: RangeKey,
    ) -> Result<PnlSeries, EngineError> {
        let end_ms = round_to_minute(self.clock.now_ms());
        let requested_start = range.duration_ms().map(|d| end_ms - d);

        // The live balance read and the history fetch are independent.
        let (balance_result, fetch_result) = tokio::join!(
            self.source.token_balance(wallet, self.config.token),
            fetch_history(
                &self.source,
                wallet,
                self.config.token,
                requested_start,
                self.config.page_size,
                self.config.max_pages,
            ),
        );

        let current_balance = match balance_result {
            Ok(balance) => balance,
            Err(e) => {
                tracing::warn!("balance read failed for {}: {}", wallet, e);
                return Ok(PnlSeries::error(range, e.to_string()));
            }
        };
        let fetch = match fetch_result {
            Ok(fetch) => fetch,
            Err(e) => {
                tracing::warn!("history fetch failed for {}: {}", wallet, e);
                return Ok(PnlSeries::error(range, e.to_string()));
            }
        };

        // A truncated fetch must fail loudly: a ledger built from it is
        // indistinguishable from a complete one.
        if !fetch.covers_target() {
            let message = match range {
                RangeKey::All => "All-time history is too large. Try a shorter range.",
                _ => "PnL history is too large for the selected range. Try a shorter range.",
            };
            return Ok(PnlSeries::error(range, message));
        }

        let ledger = build_ledger(&fetch.records, wallet);
        if ledger.is_empty() {
            return Ok(PnlSeries::no_history(
                range,
                "No transfer history for the tracked token.",
            ));
        }

        let start_ms = match requested_start {
            Some(start) => start,
            // ALL: open the window just before the oldest recorded event.
            None => ledger.first_timestamp_ms().unwrap_or(1).saturating_sub(1).max(0),
        };

        match build_series(
            &ledger,
            current_balance,
            start_ms,
            end_ms,
            self.config.token_decimals,
            self.config.token_price_usd,
        ) {
            Ok((points, delta)) => {
                tracing::info!(
                    "built {} series for {}: {} events, {} points, delta {}",
                    range,
                    wallet,
                    ledger.len(),
                    points.len(),
                    delta
                );
                Ok(PnlSeries::ok(range, points, delta))
            }
            Err(e) => Ok(PnlSeries::error(range, e.to_string())),
        }
    }

    /// Compute (or serve cached) the wallet's tracked-token summary.
    pub async fn get_wallet_summary(&self, address: &str) -> Result<WalletSummary, EngineError> {
        let wallet = parse_address(address)?;
        let key = format!("summary:{:#x}", wallet);

        self.cache
            .get_or_try_compute(&key, self.config.cache_ttl_ms, || {
                self.compute_wallet_summary(wallet)
            })
            .await
    }

    async fn compute_wallet_summary(&self, wallet: Address) -> Result<WalletSummary, EngineError> {
        let (balance_result, joined_at) = tokio::join!(
            self.source.token_balance(wallet, self.config.token),
            self.wallet_first_seen(wallet),
        );
        let balance = balance_result?;

        Ok(WalletSummary {
            address: wallet.to_string(),
            token_symbol: self.config.token_symbol.clone(),
            token_balance: format_token_amount(balance, self.config.token_decimals),
            token_price_usd: self.config.token_price_usd,
            token_value_usd: to_usd_unsigned(
                balance,
                self.config.token_decimals,
                self.config.token_price_usd,
            ),
            joined_at,
        })
    }

    /// Month-year of the wallet's first normal transaction, cached under
    /// its own key. Lookup failures degrade to "—" rather than failing
    /// the summary.
    async fn wallet_first_seen(&self, wallet: Address) -> String {
        let key = format!("first-seen:{:#x}", wallet);

        let computed: Result<String, EngineError> = self
            .cache
            .get_or_try_compute(&key, self.config.cache_ttl_ms, || async {
                let first = self
                    .source
                    .normal_transactions(wallet, SortOrder::Ascending, 1, 1)
                    .await;
                Ok(match first {
                    Ok(txs) => month_year(txs.first().map(|t| t.timestamp_ms()).unwrap_or(0)),
                    Err(e) => {
                        tracing::debug!("first-seen lookup failed for {}: {}", wallet, e);
                        month_year(0)
                    }
                })
            })
            .await;

        computed.unwrap_or_else(|_| month_year(0))
    }

    /// Compute (or serve cached) the recent deposit listing.
    pub async fn get_deposit_info(&self, address: &str) -> Result<DepositInfo, EngineError> {
        let wallet = parse_address(address)?;
        let key = format!("deposits:{:#x}:{:#x}", wallet, self.config.token);

        self.cache
            .get_or_try_compute(&key, self.config.cache_ttl_ms, || {
                self.compute_deposit_info(wallet)
            })
            .await
    }

    async fn compute_deposit_info(&self, wallet: Address) -> Result<DepositInfo, EngineError> {
        let transfers = match self
            .source
            .token_transfers(
                wallet,
                self.config.token,
                SortOrder::Descending,
                1,
                DEPOSIT_FETCH_SIZE,
            )
            .await
        {
            Ok(transfers) => transfers,
            Err(e) => {
                tracing::warn!("deposit fetch failed for {}: {}", wallet, e);
                return Ok(DepositInfo {
                    address: wallet.to_string(),
                    deposits: Vec::new(),
                    status: DataStatus::Error,
                    message: Some(e.to_string()),
                });
            }
        };

        let deposits: Vec<DepositItem> = transfers
            .iter()
            .filter(|t| t.to.parse::<Address>().ok() == Some(wallet))
            .take(MAX_DEPOSITS)
            .map(|t| {
                let decimals = t
                    .token_decimal
                    .parse::<u8>()
                    .ok()
                    .filter(|d| *d <= 77)
                    .unwrap_or(self.config.token_decimals);
                let amount = t
                    .value_raw()
                    .map(|raw| format_token_amount(raw, decimals))
                    .unwrap_or_else(|| "0".to_string());
                let symbol = if t.token_symbol.trim().is_empty() {
                    self.config.token_symbol.clone()
                } else {
                    t.token_symbol.clone()
                };
                DepositItem {
                    tx_hash: t.hash.clone(),
                    from: t.from.clone(),
                    amount,
                    symbol,
                    timestamp_ms: t.timestamp_ms(),
                }
            })
            .collect();

        if deposits.is_empty() {
            return Ok(DepositInfo {
                address: wallet.to_string(),
                deposits,
                status: DataStatus::NoHistory,
                message: Some("No deposit history yet.".to_string()),
            });
        }

        Ok(DepositInfo {
            address: wallet.to_string(),
            deposits,
            status: DataStatus::Ok,
            message: None,
        })
    }

    /// Drop every cached result for `address`.
    ///
    /// Call after any operation that changes the wallet's balance (e.g. a
    /// successful withdrawal) so the next read recomputes.
    pub fn invalidate_wallet(&self, address: &str) -> Result<(), EngineError> {
        let wallet = parse_address(address)?;
        for family in ["pnl", "summary", "deposits", "first-seen"] {
            self.cache
                .invalidate_prefix(&format!("{family}:{:#x}", wallet));
        }
        tracing::info!("invalidated cached results for {}", wallet);
        Ok(())
    }
}

/// Parse and validate a caller-supplied address before any I/O.
fn parse_address(address: &str) -> Result<Address, EngineError> {
    address
        .trim()
        .parse()
        .map_err(|_| EngineError::InvalidAddress(address.to_string()))
}
