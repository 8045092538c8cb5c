//! Page-budgeted history fetching.
//!
//! Pages are fetched newest-first; each page's continuation decision
//! depends on the previous page's oldest timestamp, so pages are requested
//! strictly sequentially. A page-count ceiling bounds total cost for
//! addresses with very long histories, and the outcome says precisely why
//! fetching stopped so the caller never serves a silently truncated series.

use crate::client::{SortOrder, TokenTransfer};
use crate::error::ExplorerError;
use crate::HistorySource;
use alloy::primitives::Address;

/// Why a history fetch stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The source ran out of records: the full history was retrieved.
    Exhausted,

    /// The oldest fetched record is at or before the requested cutoff, so
    /// the requested window is fully covered.
    ReachedTarget,

    /// The page budget was consumed before either of the above. The
    /// records are incomplete for the requested window and must not be
    /// presented as a complete answer.
    PageLimitExceeded,
}

/// Records plus the reason fetching stopped.
#[derive(Debug, Clone)]
pub struct HistoryFetch {
    /// All fetched transfer records, newest first, in page order.
    pub records: Vec<TokenTransfer>,

    /// Why fetching stopped.
    pub outcome: FetchOutcome,
}

impl HistoryFetch {
    /// True if the fetch covers the requested window: either the window
    /// cutoff was reached, or history was exhausted (there is nothing
    /// older left to cover).
    pub fn covers_target(&self) -> bool {
        !matches!(self.outcome, FetchOutcome::PageLimitExceeded)
    }
}

/// Fetch transfer history newest-first until the cutoff is covered.
///
/// # Arguments
///
/// * `target_cutoff_ms` - Lower bound of the requested window, or `None`
///   for "all time" (only source exhaustion covers it then)
/// * `page_size` - Records per page
/// * `max_pages` - Page budget; hitting it yields
///   [`FetchOutcome::PageLimitExceeded`]
///
/// # Errors
///
/// Any source failure aborts immediately and propagates; no retries happen
/// here. A retried call re-reads pages by number, which is a pure re-read.
pub async fn fetch_history<S: HistorySource>(
    source: &S,
    address: Address,
    contract: Address,
    target_cutoff_ms: Option<i64>,
    page_size: u32,
    max_pages: u32,
) -> Result<HistoryFetch, ExplorerError> {
    let mut records: Vec<TokenTransfer> = Vec::new();

    for page in 1..=max_pages {
        let batch = source
            .token_transfers(address, contract, SortOrder::Descending, page, page_size)
            .await?;

        tracing::debug!(
            "fetched page {} for {}: {} records",
            page,
            address,
            batch.len()
        );

        if batch.is_empty() {
            return Ok(HistoryFetch {
                records,
                outcome: FetchOutcome::Exhausted,
            });
        }

        let short_page = batch.len() < page_size as usize;
        let oldest_ms = batch.last().map(|t| t.timestamp_ms()).unwrap_or(0);
        records.extend(batch);

        if let Some(cutoff) = target_cutoff_ms {
            if oldest_ms > 0 && oldest_ms <= cutoff {
                return Ok(HistoryFetch {
                    records,
                    outcome: FetchOutcome::ReachedTarget,
                });
            }
        }

        if short_page {
            return Ok(HistoryFetch {
                records,
                outcome: FetchOutcome::Exhausted,
            });
        }
    }

    tracing::warn!(
        "page budget of {} exhausted for {} without covering the requested window",
        max_pages,
        address
    );

    Ok(HistoryFetch {
        records,
        outcome: FetchOutcome::PageLimitExceeded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSource;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn transfer(secs: i64) -> TokenTransfer {
        TokenTransfer {
            time_stamp: secs.to_string(),
            value: "1".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_empty_first_page_is_exhausted() {
        let source = MockSource::new();
        let fetch = fetch_history(&source, addr(1), addr(2), None, 2, 5)
            .await
            .unwrap();
        assert_eq!(fetch.outcome, FetchOutcome::Exhausted);
        assert!(fetch.records.is_empty());
        assert!(fetch.covers_target());
    }

    #[tokio::test]
    async fn test_short_page_is_exhausted() {
        let source = MockSource::new().with_transfer_pages(vec![vec![transfer(100)]]);
        let fetch = fetch_history(&source, addr(1), addr(2), Some(0), 2, 5)
            .await
            .unwrap();
        assert_eq!(fetch.outcome, FetchOutcome::Exhausted);
        assert_eq!(fetch.records.len(), 1);
    }

    #[tokio::test]
    async fn test_cutoff_reached_stops_fetching() {
        // Newest-first pages: page 1 covers [200, 150], page 2 [100, 50].
        let source = MockSource::new().with_transfer_pages(vec![
            vec![transfer(200), transfer(150)],
            vec![transfer(100), transfer(50)],
        ]);
        // Cutoff at 150s: the first page's oldest record reaches it.
        let fetch = fetch_history(&source, addr(1), addr(2), Some(150_000), 2, 5)
            .await
            .unwrap();
        assert_eq!(fetch.outcome, FetchOutcome::ReachedTarget);
        assert_eq!(fetch.records.len(), 2);
    }

    #[tokio::test]
    async fn test_page_limit_exceeded_with_cutoff() {
        let source = MockSource::new().with_transfer_pages(vec![
            vec![transfer(400), transfer(300)],
            vec![transfer(200), transfer(100)],
        ]);
        // Budget of 1 page, cutoff far in the past: not covered.
        let fetch = fetch_history(&source, addr(1), addr(2), Some(1_000), 2, 1)
            .await
            .unwrap();
        assert_eq!(fetch.outcome, FetchOutcome::PageLimitExceeded);
        assert_eq!(fetch.records.len(), 2);
        assert!(!fetch.covers_target());
    }

    #[tokio::test]
    async fn test_all_time_page_limit() {
        // Full pages beyond the budget with no cutoff: limit exceeded.
        let source = MockSource::new().with_transfer_pages(vec![
            vec![transfer(400), transfer(300)],
            vec![transfer(200), transfer(100)],
            vec![transfer(50)],
        ]);
        let fetch = fetch_history(&source, addr(1), addr(2), None, 2, 2)
            .await
            .unwrap();
        assert_eq!(fetch.outcome, FetchOutcome::PageLimitExceeded);
    }

    #[tokio::test]
    async fn test_source_error_aborts() {
        let source = MockSource::new().with_transfer_error("Max rate limit reached");
        let result = fetch_history(&source, addr(1), addr(2), None, 2, 5).await;
        assert!(matches!(result, Err(ExplorerError::Api(_))));
    }

    #[tokio::test]
    async fn test_unparseable_oldest_timestamp_does_not_count_as_reached() {
        let mut bad = transfer(0);
        bad.time_stamp = "garbage".to_string();
        let source = MockSource::new().with_transfer_pages(vec![
            vec![transfer(500), bad],
            vec![transfer(100)],
        ]);
        let fetch = fetch_history(&source, addr(1), addr(2), Some(400_000), 2, 5)
            .await
            .unwrap();
        // Page 1's oldest timestamp is unparseable, so fetching continued
        // into page 2, which is short and exhausts history.
        assert_eq!(fetch.outcome, FetchOutcome::Exhausted);
        assert_eq!(fetch.records.len(), 3);
    }
}
