//! Mock history source for testing.
//!
//! `MockSource` implements `HistorySource` with configurable responses,
//! allowing tests to run without network calls.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pnl_explorer::MockSource;
//!
//! let mock = MockSource::new()
//!     .with_transfer_pages(vec![vec![/* page 1 */], vec![/* page 2 */]])
//!     .with_balance(U256::from(1_000_000u64));
//! ```

use crate::client::{NormalTransaction, SortOrder, TokenTransfer};
use crate::error::ExplorerError;
use crate::HistorySource;
use alloy::primitives::{Address, U256};
use std::sync::atomic::{AtomicU32, Ordering};

/// Mock history source for testing.
///
/// Transfer pages are keyed by 1-based page number; requests past the
/// configured pages return empty pages. Uses builder pattern for setup.
/// Transfer queries are counted so cache tests can assert how many times
/// the source was actually hit.
#[derive(Default)]
pub struct MockSource {
    /// Transfer pages returned by `token_transfers`, newest first.
    pub transfer_pages: Vec<Vec<TokenTransfer>>,

    /// Normal transactions returned by `normal_transactions`
    /// (re-sorted per the requested order).
    pub normal_txs: Vec<NormalTransaction>,

    /// Balance returned by `token_balance`.
    pub balance: U256,

    /// When set, every transfer query fails with this explorer message.
    pub transfer_error: Option<String>,

    transfer_calls: AtomicU32,
}

impl MockSource {
    /// Create a new empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transfer pages to return (builder pattern).
    pub fn with_transfer_pages(mut self, pages: Vec<Vec<TokenTransfer>>) -> Self {
        self.transfer_pages = pages;
        self
    }

    /// Set the normal transactions to return (builder pattern).
    pub fn with_normal_txs(mut self, txs: Vec<NormalTransaction>) -> Self {
        self.normal_txs = txs;
        self
    }

    /// Set the token balance to return (builder pattern).
    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    /// Make every transfer query fail with the given message.
    pub fn with_transfer_error(mut self, message: impl Into<String>) -> Self {
        self.transfer_error = Some(message.into());
        self
    }

    /// Number of `token_transfers` calls made so far.
    pub fn transfer_call_count(&self) -> u32 {
        self.transfer_calls.load(Ordering::SeqCst)
    }
}

impl HistorySource for MockSource {
    async fn token_transfers(
        &self,
        _address: Address,
        _contract: Address,
        _sort: SortOrder,
        page: u32,
        _page_size: u32,
    ) -> Result<Vec<TokenTransfer>, ExplorerError> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.transfer_error {
            return Err(ExplorerError::Api(message.clone()));
        }
        Ok(self
            .transfer_pages
            .get(page.saturating_sub(1) as usize)
            .cloned()
            .unwrap_or_default())
    }

    async fn normal_transactions(
        &self,
        _address: Address,
        sort: SortOrder,
        _page: u32,
        page_size: u32,
    ) -> Result<Vec<NormalTransaction>, ExplorerError> {
        let mut txs = self.normal_txs.clone();
        txs.sort_by_key(|t| t.timestamp_ms());
        if sort == SortOrder::Descending {
            txs.reverse();
        }
        txs.truncate(page_size as usize);
        Ok(txs)
    }

    async fn token_balance(
        &self,
        _address: Address,
        _contract: Address,
    ) -> Result<U256, ExplorerError> {
        Ok(self.balance)
    }
}
