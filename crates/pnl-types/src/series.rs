//! PnL series types.
//!
//! A [`PnlSeries`] is a right-continuous step function: each point's value
//! holds from its timestamp until superseded by the next point. The series
//! carries a [`DataStatus`] so callers can distinguish "no history" and
//! "couldn't answer" from an ordinary result without catching errors.

use crate::RangeKey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Discriminated outcome of a data-producing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStatus {
    /// Data was produced normally.
    Ok,
    /// Zero qualifying events; a valid, expected outcome.
    NoHistory,
    /// The request could not be answered (source failure or range not
    /// coverable within the page budget).
    Error,
}

/// One point of the step-function series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Timestamp in milliseconds since Unix epoch.
    pub ts: i64,
    /// USD value, rounded to 2 decimal places.
    pub value: Decimal,
}

/// A time-bucketed PnL series for one address and range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlSeries {
    /// The requested lookback range.
    pub range: RangeKey,

    /// Ordered step-function points; empty unless `status` is `Ok`.
    pub points: Vec<SeriesPoint>,

    /// Last point's value minus first point's value.
    pub delta: Decimal,

    /// Outcome classification.
    pub status: DataStatus,

    /// Human-readable detail for `no_history` and `error` outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PnlSeries {
    /// A successful series.
    pub fn ok(range: RangeKey, points: Vec<SeriesPoint>, delta: Decimal) -> Self {
        Self {
            range,
            points,
            delta,
            status: DataStatus::Ok,
            message: None,
        }
    }

    /// An empty series for an address with no recorded history.
    pub fn no_history(range: RangeKey, message: impl Into<String>) -> Self {
        Self {
            range,
            points: Vec::new(),
            delta: Decimal::ZERO,
            status: DataStatus::NoHistory,
            message: Some(message.into()),
        }
    }

    /// A failed series with a caller-facing message.
    pub fn error(range: RangeKey, message: impl Into<String>) -> Self {
        Self {
            range,
            points: Vec::new(),
            delta: Decimal::ZERO,
            status: DataStatus::Error,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_serializes_snake_case() {
        let series = PnlSeries::no_history(RangeKey::All, "no token history");
        let json = serde_json::to_string(&series).unwrap();
        assert!(json.contains("\"status\":\"no_history\""));
        assert!(json.contains("\"range\":\"ALL\""));
    }

    #[test]
    fn test_ok_series_has_no_message() {
        let points = vec![
            SeriesPoint { ts: 0, value: dec!(0.00) },
            SeriesPoint { ts: 1_000, value: dec!(1.00) },
        ];
        let series = PnlSeries::ok(RangeKey::D1, points, dec!(1.00));
        let json = serde_json::to_string(&series).unwrap();
        assert!(!json.contains("message"));
        assert!(json.contains("\"status\":\"ok\""));
    }
}
