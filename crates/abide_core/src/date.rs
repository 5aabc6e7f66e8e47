//! Date helpers for record dates and comment timestamps.
//!
//! Record dates are stored as zero-padded `YYYY-MM-DD` strings so that the
//! collection views can sort them with a plain string comparison. Input may
//! also be given in natural language ("today", "last sunday", "3 days ago")
//! via chrono-english.

use chrono::{Local, NaiveDate, SecondsFormat, Utc};
use chrono_english::{Dialect, parse_date_string};

use crate::error::{AbideError, Result};

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Parse a date string into a NaiveDate.
///
/// Accepts `YYYY-MM-DD` or anything chrono-english understands.
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    let date_str = date_str.trim();
    if let Ok(date) = NaiveDate::parse_from_str(date_str, ISO_FORMAT) {
        return Ok(date);
    }

    parse_date_string(date_str, Local::now(), Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|_| AbideError::InvalidDate(date_str.to_string()))
}

/// Parse a date string and format it as a stored record date.
pub fn normalize_date(date_str: &str) -> Result<String> {
    parse_date(date_str).map(|date| format_date(&date))
}

/// Format a date the way records store it.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today_iso() -> String {
    format_date(&Local::now().date_naive())
}

/// The current instant as an RFC 3339 timestamp in UTC, e.g. `2024-03-01T08:15:00.000Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whether `s` is a valid zero-padded `YYYY-MM-DD` date.
pub fn is_iso_date(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, ISO_FORMAT).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_iso_date() {
        let date = parse_date("2024-01-15").unwrap();
        assert_eq!(format_date(&date), "2024-01-15");
    }

    #[test]
    fn test_parse_today() {
        let date = parse_date("today").unwrap();
        assert_eq!(date, Local::now().date_naive());
    }

    #[test]
    fn test_parse_yesterday() {
        let date = parse_date("yesterday").unwrap();
        assert_eq!(date, Local::now().date_naive() - Duration::days(1));
    }

    #[test]
    fn test_parse_invalid_date() {
        let err = parse_date("not a date at all").unwrap_err();
        assert!(matches!(err, AbideError::InvalidDate(_)));
    }

    #[test]
    fn test_normalize_pads_output() {
        assert_eq!(normalize_date("2024-03-07").unwrap(), "2024-03-07");
    }

    #[test]
    fn test_is_iso_date() {
        assert!(is_iso_date("2024-02-29"));
        assert!(!is_iso_date("2023-02-29"));
        assert!(!is_iso_date("2024-2-9"));
        assert!(is_iso_date(&today_iso()));
    }

    #[test]
    fn test_now_timestamp_is_rfc3339() {
        let ts = now_timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        assert!(ts.ends_with('Z'));
    }
}
