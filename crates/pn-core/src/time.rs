//! Lenient timestamp parsing.
//!
//! Creation stamps arrive from several producers: RFC 3339 with an offset,
//! naive ISO date-times, or bare dates. Naive forms are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Sort key for a missing or unreadable timestamp; always ranks last.
pub const TIMESTAMP_UNKNOWN: i64 = i64::MAX;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp into milliseconds since the Unix epoch.
pub fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}
