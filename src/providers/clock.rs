//! Eastern wall-clock helpers. Market times are quoted in ET.

use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::America::New_York;

use crate::error::ConfigError;

const FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Convert `YYYY-MM-DD HH:MM` Eastern time to UTC epoch milliseconds.
/// Ambiguous fall-back times resolve to the earlier instant.
pub fn eastern_to_utc_ms(s: &str) -> Result<i64, ConfigError> {
    let naive = FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
        .ok_or_else(|| ConfigError::InvalidTime(s.to_string()))?;

    New_York
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| ConfigError::InvalidTime(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eastern_standard_and_daylight() {
        // 2025-01-15 12:00 EST = 17:00 UTC
        assert_eq!(eastern_to_utc_ms("2025-01-15 12:00").unwrap(), 1736960400000);
        // 2025-07-04 12:00 EDT = 16:00 UTC
        assert_eq!(eastern_to_utc_ms("2025-07-04T12:00:00").unwrap(), 1751644800000);
    }

    #[test]
    fn test_invalid_and_skipped_times() {
        assert!(eastern_to_utc_ms("Jan 15").is_err());
        // Clocks jump from 02:00 to 03:00 on 2025-03-09
        assert_eq!(
            eastern_to_utc_ms("2025-03-09 02:30"),
            Err(ConfigError::InvalidTime("2025-03-09 02:30".into()))
        );
    }
}
