//! Timestamp helpers.

use chrono::DateTime;

/// Round a millisecond timestamp down to the start of its minute.
///
/// Series end points are minute-aligned so repeated requests within one
/// cache TTL ask for the same window.
pub fn round_to_minute(timestamp_ms: i64) -> i64 {
    timestamp_ms.div_euclid(60_000) * 60_000
}

/// Format a millisecond timestamp as "Mon YYYY" (UTC), or a dash when the
/// timestamp is missing/invalid.
pub fn month_year(timestamp_ms: i64) -> String {
    if timestamp_ms <= 0 {
        return "—".to_string();
    }
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%b %Y").to_string())
        .unwrap_or_else(|| "—".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_minute() {
        assert_eq!(round_to_minute(0), 0);
        assert_eq!(round_to_minute(59_999), 0);
        assert_eq!(round_to_minute(60_000), 60_000);
        assert_eq!(round_to_minute(119_001), 60_000);
    }

    #[test]
    fn test_month_year() {
        // 2024-01-01T00:00:00Z
        assert_eq!(month_year(1_704_067_200_000), "Jan 2024");
        assert_eq!(month_year(0), "—");
        assert_eq!(month_year(-5), "—");
    }
}
