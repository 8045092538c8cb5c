//! Step-function series assembly.
//!
//! Turns a replayed window into the list of `(timestamp, USD value)`
//! points the caller charts: an initial point at the range start, one
//! point per in-range event, and a terminal point at exactly the range
//! end. Integer arithmetic stays exact throughout; USD conversion and
//! rounding happen per emitted point.

use alloy::primitives::U256;
use pnl_types::{to_usd, Ledger, SeriesPoint, TypeError};
use rust_decimal::Decimal;

/// Build the series points for `(start_ms, end_ms]` plus the first/last
/// delta.
///
/// The caller is responsible for the empty-ledger and truncated-fetch
/// policies; by the time this runs, the ledger is known to be a complete
/// record of the requested window.
pub fn build_series(
    ledger: &Ledger,
    current_balance: U256,
    start_ms: i64,
    end_ms: i64,
    decimals: u8,
    price_usd: f64,
) -> Result<(Vec<SeriesPoint>, Decimal), TypeError> {
    let replay = ledger.replay_window(current_balance, start_ms, end_ms)?;

    if replay.balance_at_start.is_negative() {
        tracing::warn!(
            "negative replayed balance {} at {}: transfer history is incomplete",
            replay.balance_at_start,
            start_ms
        );
    }

    let mut points = vec![SeriesPoint {
        ts: start_ms,
        value: to_usd(replay.balance_at_start, decimals, price_usd),
    }];

    let mut running = replay.balance_at_start;
    for event in replay.events_in_range {
        running = running
            .checked_add(event.delta_raw)
            .ok_or(TypeError::BalanceOverflow)?;
        let value = to_usd(running, decimals, price_usd);
        match points.last_mut() {
            // One value per distinct instant: a same-timestamp point
            // supersedes the previous one instead of duplicating it.
            Some(last) if last.ts == event.timestamp_ms => last.value = value,
            _ => points.push(SeriesPoint {
                ts: event.timestamp_ms,
                value,
            }),
        }
    }

    let end_value = to_usd(replay.balance_at_end, decimals, price_usd);
    let already_terminal = points
        .last()
        .map(|p| p.ts == end_ms && p.value == end_value)
        .unwrap_or(false);
    if !already_terminal {
        points.push(SeriesPoint {
            ts: end_ms,
            value: end_value,
        });
    }

    let first = points.first().map(|p| p.value).unwrap_or(end_value);
    let last = points.last().map(|p| p.value).unwrap_or(end_value);
    Ok((points, last - first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::I256;
    use pnl_types::LedgerEvent;
    use rust_decimal_macros::dec;

    fn event(timestamp_ms: i64, delta: i64) -> LedgerEvent {
        LedgerEvent {
            timestamp_ms,
            delta_raw: I256::try_from(delta).unwrap(),
        }
    }

    #[test]
    fn test_single_deposit_series() {
        // 1_000_000 raw units at 6 decimals and $1: one deposit at t=1000.
        let ledger = Ledger::new(vec![event(1_000, 1_000_000)]);
        let (points, delta) =
            build_series(&ledger, U256::from(1_000_000u64), 0, 2_000, 6, 1.0).unwrap();

        assert_eq!(
            points,
            vec![
                SeriesPoint { ts: 0, value: dec!(0.00) },
                SeriesPoint { ts: 1_000, value: dec!(1.00) },
                SeriesPoint { ts: 2_000, value: dec!(1.00) },
            ]
        );
        assert_eq!(delta, dec!(1.00));
    }

    #[test]
    fn test_no_duplicate_adjacent_timestamps() {
        let ledger = Ledger::new(vec![event(500, 10), event(501, -3)]);
        let (points, _) = build_series(&ledger, U256::from(7u64), 0, 1_000, 0, 1.0).unwrap();

        for pair in points.windows(2) {
            assert!(pair[0].ts < pair[1].ts);
        }
        assert_eq!(points.len(), 4); // start, two events, end
    }

    #[test]
    fn test_event_exactly_at_end_skips_terminal_duplicate() {
        let ledger = Ledger::new(vec![event(2_000, 50)]);
        let (points, _) = build_series(&ledger, U256::from(50u64), 0, 2_000, 0, 1.0).unwrap();

        // The event point already is the terminal point.
        assert_eq!(points.last().unwrap().ts, 2_000);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_negative_delta() {
        // A withdrawal inside the window: delta is negative.
        let ledger = Ledger::new(vec![event(1_000, -3_000_000)]);
        let (points, delta) =
            build_series(&ledger, U256::from(1_000_000u64), 0, 2_000, 6, 1.0).unwrap();

        assert_eq!(points[0].value, dec!(4.00));
        assert_eq!(delta, dec!(-3.00));
    }

    #[test]
    fn test_forward_replay_reproduces_end_balance() {
        let ledger = Ledger::new(vec![
            event(100, 7),
            event(200, -2),
            event(300, 4),
        ]);
        let (points, _) = build_series(&ledger, U256::from(9u64), 50, 400, 0, 1.0).unwrap();

        // Last point's value equals the end-of-window balance in USD.
        assert_eq!(points.last().unwrap().value, dec!(9.00));
    }

    #[test]
    fn test_events_outside_window_are_excluded() {
        let ledger = Ledger::new(vec![event(100, 5), event(900, 5)]);
        let (points, delta) = build_series(&ledger, U256::from(10u64), 200, 800, 0, 1.0).unwrap();

        // No in-range events: flat two-point series at the window balance.
        assert_eq!(
            points,
            vec![
                SeriesPoint { ts: 200, value: dec!(5.00) },
                SeriesPoint { ts: 800, value: dec!(5.00) },
            ]
        );
        assert_eq!(delta, dec!(0.00));
    }
}
