//! Lookback range enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed enumeration of lookback windows for the PnL series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeKey {
    #[serde(rename = "1H")]
    H1,
    #[serde(rename = "6H")]
    H6,
    #[serde(rename = "1D")]
    D1,
    #[serde(rename = "1W")]
    W1,
    #[serde(rename = "1M")]
    M1,
    #[serde(rename = "ALL")]
    All,
}

impl RangeKey {
    /// Window duration in milliseconds, or `None` for `ALL` (no lower bound).
    pub fn duration_ms(&self) -> Option<i64> {
        match self {
            RangeKey::H1 => Some(60 * 60 * 1000),
            RangeKey::H6 => Some(6 * 60 * 60 * 1000),
            RangeKey::D1 => Some(24 * 60 * 60 * 1000),
            RangeKey::W1 => Some(7 * 24 * 60 * 60 * 1000),
            RangeKey::M1 => Some(30 * 24 * 60 * 60 * 1000),
            RangeKey::All => None,
        }
    }

    /// The canonical string form, as used in cache keys and the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeKey::H1 => "1H",
            RangeKey::H6 => "6H",
            RangeKey::D1 => "1D",
            RangeKey::W1 => "1W",
            RangeKey::M1 => "1M",
            RangeKey::All => "ALL",
        }
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "1H" => Ok(RangeKey::H1),
            "6H" => Ok(RangeKey::H6),
            "1D" => Ok(RangeKey::D1),
            "1W" => Ok(RangeKey::W1),
            "1M" => Ok(RangeKey::M1),
            "ALL" => Ok(RangeKey::All),
            other => Err(format!("unknown range: {other}")),
        }
    }
}
