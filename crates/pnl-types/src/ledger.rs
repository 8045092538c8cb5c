//! Ledger types and backward balance replay.
//!
//! This module provides [`Ledger`], the normalized event sequence derived
//! from raw token transfers, and the replay logic that reconstructs the
//! balance at any past instant from the authoritative *current* balance.
//!
//! # Ordering invariant
//!
//! Event timestamps within a ledger are strictly increasing. The builder
//! (in `pnl-engine`) guarantees this by bumping same-second events to the
//! next representable millisecond, so every event is individually
//! addressable as a point in the replay.
//!
//! # Replay direction
//!
//! The only authoritative balance is the current one (a live on-chain
//! read). Historical balances are inferred by walking the ledger backward
//! from "now" and subtracting each event's signed delta. This assumes the
//! transfer log fully captures all balance changes; when it does not, a
//! replayed balance can go negative, which callers surface as an anomaly
//! instead of clamping.

use crate::TypeError;
use alloy::primitives::{Sign, I256, U256};
use serde::{Deserialize, Serialize};

/// One normalized, signed balance-affecting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Effective timestamp (milliseconds since Unix epoch).
    /// Strictly greater than the previous event's timestamp.
    pub timestamp_ms: i64,

    /// Signed raw-unit delta relative to the tracked address
    /// (positive for incoming transfers, negative for outgoing).
    pub delta_raw: I256,
}

/// Result of replaying one time window in a single backward pass.
///
/// Borrow of the ledger's in-range events; valid for the duration of one
/// reconstruction request.
#[derive(Debug, Clone, Copy)]
pub struct WindowReplay<'a> {
    /// Balance at the window start (raw units, may be negative for
    /// incomplete history).
    pub balance_at_start: I256,

    /// Balance at the window end (raw units).
    pub balance_at_end: I256,

    /// Events with `start < timestamp <= end`, in ledger order.
    pub events_in_range: &'a [LedgerEvent],
}

/// A strictly time-ordered sequence of ledger events for one address.
///
/// Immutable once built. An empty ledger means "no recorded history",
/// which is a valid outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    events: Vec<LedgerEvent>,
}

impl Ledger {
    /// Wrap an ordered event sequence.
    ///
    /// The events must already be strictly increasing by timestamp; this
    /// is the builder's responsibility and is only debug-checked here.
    pub fn new(events: Vec<LedgerEvent>) -> Self {
        debug_assert!(
            events.windows(2).all(|w| w[0].timestamp_ms < w[1].timestamp_ms),
            "ledger events must be strictly increasing by timestamp"
        );
        Self { events }
    }

    /// An empty ledger (no recorded history).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The ordered events.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if there are no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Timestamp of the oldest event, if any.
    pub fn first_timestamp_ms(&self) -> Option<i64> {
        self.events.first().map(|e| e.timestamp_ms)
    }

    /// Timestamp of the newest event, if any.
    pub fn last_timestamp_ms(&self) -> Option<i64> {
        self.events.last().map(|e| e.timestamp_ms)
    }

    /// Compute the balance at `target_ms` by walking backward from now.
    ///
    /// Every event with `timestamp > target_ms` is subtracted from
    /// `current_balance`. For any target at or after the last event this
    /// returns `current_balance` unchanged; for a target before the first
    /// event it returns the balance prior to all recorded activity.
    pub fn balance_at(&self, current_balance: U256, target_ms: i64) -> Result<I256, TypeError> {
        let mut balance = to_signed(current_balance)?;
        for event in self.events.iter().rev() {
            if event.timestamp_ms <= target_ms {
                break;
            }
            balance = balance
                .checked_sub(event.delta_raw)
                .ok_or(TypeError::BalanceOverflow)?;
        }
        Ok(balance)
    }

    /// Replay one window, sharing a single backward pass across both
    /// boundaries.
    ///
    /// Equivalent to calling [`balance_at`](Self::balance_at) for
    /// `end_ms` and `start_ms` separately, but each event after
    /// `start_ms` is visited exactly once.
    pub fn replay_window(
        &self,
        current_balance: U256,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<WindowReplay<'_>, TypeError> {
        // First index with timestamp > start_ms / > end_ms.
        let start_idx = self.events.partition_point(|e| e.timestamp_ms <= start_ms);
        let end_idx = self.events.partition_point(|e| e.timestamp_ms <= end_ms);

        let mut balance_at_end = to_signed(current_balance)?;
        for event in &self.events[end_idx..] {
            balance_at_end = balance_at_end
                .checked_sub(event.delta_raw)
                .ok_or(TypeError::BalanceOverflow)?;
        }

        let events_in_range = &self.events[start_idx..end_idx];
        let mut balance_at_start = balance_at_end;
        for event in events_in_range {
            balance_at_start = balance_at_start
                .checked_sub(event.delta_raw)
                .ok_or(TypeError::BalanceOverflow)?;
        }

        Ok(WindowReplay {
            balance_at_start,
            balance_at_end,
            events_in_range,
        })
    }
}

/// Convert an unsigned current balance into the signed replay domain.
fn to_signed(balance: U256) -> Result<I256, TypeError> {
    I256::checked_from_sign_and_abs(Sign::Positive, balance).ok_or(TypeError::BalanceOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(timestamp_ms: i64, delta: i64) -> LedgerEvent {
        LedgerEvent {
            timestamp_ms,
            delta_raw: I256::try_from(delta).unwrap(),
        }
    }

    fn signed(value: i64) -> I256 {
        I256::try_from(value).unwrap()
    }

    #[test]
    fn test_empty_ledger_replay_is_identity() {
        let ledger = Ledger::empty();
        let balance = ledger.balance_at(U256::from(1_000u64), 0).unwrap();
        assert_eq!(balance, signed(1_000));
    }

    #[test]
    fn test_balance_at_or_after_last_event_is_current() {
        let ledger = Ledger::new(vec![event(1_000, 500), event(2_000, -200)]);
        let current = U256::from(300u64);

        assert_eq!(ledger.balance_at(current, 2_000).unwrap(), signed(300));
        assert_eq!(ledger.balance_at(current, 5_000).unwrap(), signed(300));
    }

    #[test]
    fn test_balance_before_first_event() {
        let ledger = Ledger::new(vec![event(1_000, 500), event(2_000, -200)]);
        // current = 300 = 0 + 500 - 200
        let before = ledger.balance_at(U256::from(300u64), 500).unwrap();
        assert_eq!(before, I256::ZERO);
    }

    #[test]
    fn test_incomplete_history_yields_negative_balance() {
        // A recorded deposit larger than the current balance implies an
        // unrecorded outflow somewhere: replaying backward past the
        // deposit goes negative, which is surfaced, not clamped.
        let ledger = Ledger::new(vec![event(1_000, 400)]);
        let before = ledger.balance_at(U256::from(100u64), 0).unwrap();
        assert_eq!(before, signed(-300));
    }

    #[test]
    fn test_replay_window_conservation() {
        let ledger = Ledger::new(vec![
            event(1_000, 500),
            event(2_000, -200),
            event(3_000, 100),
            event(4_000, -50),
        ]);
        // current balance after all events: 350
        let replay = ledger
            .replay_window(U256::from(350u64), 1_500, 3_500)
            .unwrap();

        assert_eq!(replay.balance_at_end, signed(400)); // 350 + 50
        assert_eq!(replay.events_in_range.len(), 2);
        assert_eq!(replay.balance_at_start, signed(500)); // 400 + 200 - 100

        // Replaying forward through the in-range events reproduces the
        // end balance exactly.
        let mut running = replay.balance_at_start;
        for e in replay.events_in_range {
            running = running.checked_add(e.delta_raw).unwrap();
        }
        assert_eq!(running, replay.balance_at_end);
    }

    #[test]
    fn test_replay_window_boundaries_are_half_open() {
        let ledger = Ledger::new(vec![event(1_000, 10), event(2_000, 20)]);
        // start is exclusive, end is inclusive
        let replay = ledger
            .replay_window(U256::from(30u64), 1_000, 2_000)
            .unwrap();
        assert_eq!(replay.events_in_range.len(), 1);
        assert_eq!(replay.events_in_range[0].timestamp_ms, 2_000);
    }

    #[test]
    fn test_replay_window_matches_balance_at() {
        let ledger = Ledger::new(vec![
            event(100, 7),
            event(200, -3),
            event(300, 11),
            event(400, -5),
        ]);
        let current = U256::from(10u64);
        let replay = ledger.replay_window(current, 150, 350).unwrap();

        assert_eq!(
            replay.balance_at_start,
            ledger.balance_at(current, 150).unwrap()
        );
        assert_eq!(
            replay.balance_at_end,
            ledger.balance_at(current, 350).unwrap()
        );
    }
}
