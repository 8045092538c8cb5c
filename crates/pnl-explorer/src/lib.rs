//! # pnl-explorer
//!
//! Block-explorer data layer for the ERC-20 PnL ledger.
//!
//! This crate provides a [`HistorySource`] trait abstraction over an
//! Etherscan-compatible API, plus the page-budgeted [`fetch_history`]
//! routine the reconstruction engine builds on.
//!
//! ## Design Principles
//!
//! - **Zero-cost async**: Uses native async traits (Rust 1.75+), avoiding
//!   the heap allocations that `async_trait` would require.
//!
//! - **Thin client**: [`EtherscanClient`] wraps `reqwest` with envelope
//!   decoding and error normalization, nothing more. No retries, no
//!   caching; both belong to callers.
//!
//! - **Testable**: The [`MockSource`] implementation allows testing without
//!   network calls.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use alloy::primitives::Address;
//! use pnl_explorer::{fetch_history, EtherscanClient, ExplorerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EtherscanClient::new(ExplorerConfig::new("YourApiKey"));
//!
//!     let wallet: Address = "0x1111111111111111111111111111111111111111".parse()?;
//!     let token: Address = "0x2222222222222222222222222222222222222222".parse()?;
//!
//!     // Newest-first transfer history, bounded by a 40-page budget.
//!     let fetch = fetch_history(&client, wallet, token, None, 1000, 40).await?;
//!     println!("{} records ({:?})", fetch.records.len(), fetch.outcome);
//!     Ok(())
//! }
//! ```
//!
//! ## Pagination Contract
//!
//! Transfer pages are fetched newest-first and strictly sequentially,
//! because each page's continuation decision depends on the previous
//! page's oldest timestamp. [`fetch_history`] classifies every stop as
//! exhausted / target reached / page limit exceeded so callers can refuse
//! to serve truncated answers. See [`FetchOutcome`].

mod client;
pub mod config;
pub mod error;
mod mock;
mod paginate;

pub use client::{EtherscanClient, NormalTransaction, SortOrder, TokenTransfer};
pub use config::ExplorerConfig;
pub use error::ExplorerError;
pub use mock::MockSource;
pub use paginate::{fetch_history, FetchOutcome, HistoryFetch};

use alloy::primitives::{Address, U256};

/// Data source abstraction for historical and current on-chain data.
///
/// This trait defines the interface the reconstruction engine fetches
/// through. It uses native async syntax (Rust 1.75+) rather than
/// `async_trait` to avoid heap allocations from `Box<dyn Future>`.
///
/// ## Implementors
///
/// - [`EtherscanClient`]: Production implementation over the explorer API
/// - [`MockSource`]: Test implementation with configurable responses
///
/// ## Why `Send + Sync`?
///
/// Sources are shared across async tasks (the engine is held in shared
/// state and used from concurrent request handlers), so the trait
/// requires both.
pub trait HistorySource: Send + Sync {
    /// Fetch one page of ERC-20 transfers of `contract` touching `address`.
    ///
    /// Pages are 1-based; an empty page means there is no more data.
    fn token_transfers(
        &self,
        address: Address,
        contract: Address,
        sort: SortOrder,
        page: u32,
        page_size: u32,
    ) -> impl std::future::Future<Output = Result<Vec<TokenTransfer>, ExplorerError>> + Send;

    /// Fetch one page of normal transactions for `address`.
    fn normal_transactions(
        &self,
        address: Address,
        sort: SortOrder,
        page: u32,
        page_size: u32,
    ) -> impl std::future::Future<Output = Result<Vec<NormalTransaction>, ExplorerError>> + Send;

    /// Read the current raw token balance of `address` for `contract`.
    ///
    /// This is the single authoritative point-in-time value all backward
    /// replay starts from.
    fn token_balance(
        &self,
        address: Address,
        contract: Address,
    ) -> impl std::future::Future<Output = Result<U256, ExplorerError>> + Send;
}

impl HistorySource for EtherscanClient {
    async fn token_transfers(
        &self,
        address: Address,
        contract: Address,
        sort: SortOrder,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<TokenTransfer>, ExplorerError> {
        EtherscanClient::token_transfers(self, address, contract, sort, page, page_size).await
    }

    async fn normal_transactions(
        &self,
        address: Address,
        sort: SortOrder,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<NormalTransaction>, ExplorerError> {
        EtherscanClient::normal_transactions(self, address, sort, page, page_size).await
    }

    async fn token_balance(
        &self,
        address: Address,
        contract: Address,
    ) -> Result<U256, ExplorerError> {
        EtherscanClient::token_balance(self, address, contract).await
    }
}
