//! Time utility functions

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Timestamp text layout accepted by both warehouses (millisecond precision)
pub const SQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Earliest instant both warehouses can hold (0001-01-01T00:00:00Z)
pub const MIN_SQL_TIMESTAMP_MS: i64 = -62_135_596_800_000;

/// Latest instant both warehouses can hold (9999-12-31T23:59:59.999Z)
pub const MAX_SQL_TIMESTAMP_MS: i64 = 253_402_300_799_999;

/// Clamp epoch milliseconds into the range both warehouses can hold
pub fn clamp_sql_millis(millis: i64) -> i64 {
    millis.clamp(MIN_SQL_TIMESTAMP_MS, MAX_SQL_TIMESTAMP_MS)
}

/// Convert milliseconds since Unix epoch to DateTime<Utc>
///
/// Returns `None` when the value is outside the representable range.
pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Format milliseconds since Unix epoch as warehouse timestamp text (UTC)
pub fn millis_to_sql_timestamp(millis: i64) -> Option<String> {
    millis_to_datetime(millis).map(|dt| dt.format(SQL_TIMESTAMP_FORMAT).to_string())
}

/// Parse a duration such as `30s`, `500ms`, `2m` or `1h`.
///
/// A bare number is read as seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    let split = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    let value: f64 = number
        .parse()
        .map_err(|_| format!("invalid duration '{}'", input))?;

    let secs = match unit {
        "" | "s" => value,
        "ms" => value / 1000.0,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        other => return Err(format!("unknown duration unit '{}' in '{}'", other, input)),
    };

    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid duration '{}': {}", input, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_millis_to_datetime_epoch() {
        let dt = millis_to_datetime(0).unwrap();
        assert_eq!(dt.year(), 1970);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 1);
    }

    #[test]
    fn test_millis_to_datetime_keeps_millis() {
        let dt = millis_to_datetime(1_704_067_200_123).unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.nanosecond(), 123_000_000);
    }

    #[test]
    fn test_millis_to_datetime_out_of_range() {
        assert!(millis_to_datetime(i64::MAX).is_none());
    }

    #[test]
    fn test_millis_to_sql_timestamp() {
        assert_eq!(
            millis_to_sql_timestamp(1_704_067_200_123).as_deref(),
            Some("2024-01-01 00:00:00.123")
        );
        assert_eq!(
            millis_to_sql_timestamp(-1).as_deref(),
            Some("1969-12-31 23:59:59.999")
        );
    }

    #[test]
    fn test_clamp_sql_millis() {
        assert_eq!(clamp_sql_millis(i64::MAX), MAX_SQL_TIMESTAMP_MS);
        assert_eq!(clamp_sql_millis(i64::MIN), MIN_SQL_TIMESTAMP_MS);
        assert_eq!(clamp_sql_millis(1_000), 1_000);
        assert_eq!(
            millis_to_sql_timestamp(MAX_SQL_TIMESTAMP_MS).as_deref(),
            Some("9999-12-31 23:59:59.999")
        );
        assert_eq!(
            millis_to_sql_timestamp(MIN_SQL_TIMESTAMP_MS).as_deref(),
            Some("0001-01-01 00:00:00.000")
        );
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn test_parse_duration_bare_number_is_seconds() {
        assert_eq!(parse_duration("45").unwrap(), Duration::from_secs(45));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("10d").is_err());
        assert!(parse_duration("s").is_err());
    }
}
