//! Ledger construction from raw transfer records.
//!
//! Converts the explorer's wire records into the normalized, strictly
//! time-ordered [`Ledger`] the replay operates on.
//!
//! # Ordering
//!
//! The canonical event order is `(timestamp, block number, transaction
//! index, input order)`. The input position is the final tiebreaker so
//! the result is deterministic even when the source returns ties on all
//! other fields. After sorting, any event whose timestamp is not strictly
//! greater than its predecessor's is bumped to `previous + 1 ms`; the
//! source only has whole-second resolution, and two transfers in the same
//! second must still be individually addressable replay points.
//!
//! # Dropped records
//!
//! Records are dropped when the timestamp is missing/non-positive, when
//! the amount fails to parse or is zero, and when neither endpoint is the
//! tracked address (should not occur given the source filter).

use alloy::primitives::{Address, Sign, I256};
use pnl_explorer::TokenTransfer;
use pnl_types::{Ledger, LedgerEvent};

struct OrderedRecord {
    timestamp_ms: i64,
    delta_raw: I256,
    block_number: u64,
    transaction_index: u64,
    input_order: usize,
}

/// Build the ordered ledger for `address` from raw transfer records.
///
/// Empty input (or input where every record is dropped) yields an empty
/// ledger, which callers treat as "no history".
pub fn build_ledger(records: &[TokenTransfer], address: Address) -> Ledger {
    let mut ordered: Vec<OrderedRecord> = records
        .iter()
        .enumerate()
        .filter_map(|(input_order, record)| {
            let timestamp_ms = record.timestamp_ms();
            if timestamp_ms <= 0 {
                return None;
            }
            let delta_raw = transfer_delta(record, address)?;
            Some(OrderedRecord {
                timestamp_ms,
                delta_raw,
                block_number: record.block_number_u64(),
                transaction_index: record.transaction_index_u64(),
                input_order,
            })
        })
        .collect();

    ordered.sort_by_key(|r| {
        (
            r.timestamp_ms,
            r.block_number,
            r.transaction_index,
            r.input_order,
        )
    });

    let mut events = Vec::with_capacity(ordered.len());
    let mut last_ms = 0i64;
    for record in ordered {
        let timestamp_ms = if record.timestamp_ms <= last_ms {
            last_ms + 1
        } else {
            record.timestamp_ms
        };
        events.push(LedgerEvent {
            timestamp_ms,
            delta_raw: record.delta_raw,
        });
        last_ms = timestamp_ms;
    }

    Ledger::new(events)
}

/// Signed delta of one transfer relative to `address`, or `None` if the
/// record does not affect it.
fn transfer_delta(record: &TokenTransfer, address: Address) -> Option<I256> {
    let raw = record.value_raw()?;
    if raw.is_zero() {
        return None;
    }
    let magnitude = I256::checked_from_sign_and_abs(Sign::Positive, raw)?;

    let to = record.to.parse::<Address>().ok();
    if to == Some(address) {
        return Some(magnitude);
    }
    let from = record.from.parse::<Address>().ok();
    if from == Some(address) {
        return magnitude.checked_neg();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET: &str = "0x1111111111111111111111111111111111111111";
    const OTHER: &str = "0x2222222222222222222222222222222222222222";

    fn wallet() -> Address {
        WALLET.parse().unwrap()
    }

    fn incoming(secs: i64, value: &str) -> TokenTransfer {
        TokenTransfer {
            time_stamp: secs.to_string(),
            from: OTHER.to_string(),
            to: WALLET.to_string(),
            value: value.to_string(),
            ..Default::default()
        }
    }

    fn outgoing(secs: i64, value: &str) -> TokenTransfer {
        TokenTransfer {
            time_stamp: secs.to_string(),
            from: WALLET.to_string(),
            to: OTHER.to_string(),
            value: value.to_string(),
            ..Default::default()
        }
    }

    fn signed(value: i64) -> I256 {
        I256::try_from(value).unwrap()
    }

    #[test]
    fn test_empty_input_yields_empty_ledger() {
        assert!(build_ledger(&[], wallet()).is_empty());
    }

    #[test]
    fn test_signs_relative_to_address() {
        let ledger = build_ledger(&[incoming(10, "500"), outgoing(20, "200")], wallet());
        assert_eq!(ledger.events()[0].delta_raw, signed(500));
        assert_eq!(ledger.events()[1].delta_raw, signed(-200));
    }

    #[test]
    fn test_sorts_oldest_first() {
        // Records arrive newest-first from the fetcher.
        let ledger = build_ledger(&[incoming(30, "3"), incoming(10, "1"), incoming(20, "2")], wallet());
        let timestamps: Vec<i64> = ledger.events().iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(timestamps, vec![10_000, 20_000, 30_000]);
    }

    #[test]
    fn test_same_second_events_get_distinct_timestamps() {
        let ledger = build_ledger(&[incoming(500, "10"), outgoing(500, "3")], wallet());
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.events()[0].timestamp_ms, 500_000);
        assert_eq!(ledger.events()[1].timestamp_ms, 500_001);
        assert_eq!(ledger.events()[0].delta_raw, signed(10));
        assert_eq!(ledger.events()[1].delta_raw, signed(-3));
    }

    #[test]
    fn test_ties_break_by_block_then_index() {
        let mut a = incoming(100, "1");
        a.block_number = "50".to_string();
        a.transaction_index = "7".to_string();
        let mut b = incoming(100, "2");
        b.block_number = "50".to_string();
        b.transaction_index = "3".to_string();
        let mut c = incoming(100, "3");
        c.block_number = "49".to_string();
        c.transaction_index = "9".to_string();

        let ledger = build_ledger(&[a, b, c], wallet());
        let deltas: Vec<I256> = ledger.events().iter().map(|e| e.delta_raw).collect();
        // block 49 first, then block 50 by transaction index
        assert_eq!(deltas, vec![signed(3), signed(2), signed(1)]);
    }

    #[test]
    fn test_full_ties_preserve_input_order() {
        let ledger = build_ledger(&[incoming(100, "1"), incoming(100, "2")], wallet());
        assert_eq!(ledger.events()[0].delta_raw, signed(1));
        assert_eq!(ledger.events()[1].delta_raw, signed(2));
    }

    #[test]
    fn test_drops_bad_records() {
        let mut bad_ts = incoming(0, "5");
        bad_ts.time_stamp = "garbage".to_string();
        let zero = incoming(10, "0");
        let unparseable = incoming(10, "not-a-number");
        let mut foreign = incoming(10, "5");
        foreign.to = OTHER.to_string();

        let ledger = build_ledger(&[bad_ts, zero, unparseable, foreign, incoming(10, "5")], wallet());
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.events()[0].delta_raw, signed(5));
    }

    #[test]
    fn test_self_transfer_counts_as_incoming() {
        // from == to == wallet: the recipient check wins.
        let mut transfer = incoming(10, "5");
        transfer.from = WALLET.to_string();
        let ledger = build_ledger(&[transfer], wallet());
        assert_eq!(ledger.events()[0].delta_raw, signed(5));
    }

    #[test]
    fn test_monotonic_across_many_duplicates() {
        let records: Vec<TokenTransfer> = (0..5).map(|_| incoming(100, "1")).collect();
        let ledger = build_ledger(&records, wallet());
        let timestamps: Vec<i64> = ledger.events().iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(
            timestamps,
            vec![100_000, 100_001, 100_002, 100_003, 100_004]
        );
    }
}
