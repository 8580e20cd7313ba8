//! Publication-date normalization.
//!
//! Feeds in the wild put almost anything in `<pubDate>`. The normalizer
//! tries a fixed, ordered list of patterns and returns the first hit;
//! order matters only for strings that could match more than one pattern.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use thiserror::Error;

/// No pattern matched. Per-item failure: the ingestor skips the item and
/// moves on.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized publication date {0:?}")]
pub struct UnparseableDate(pub String);

/// Offset-carrying datetimes not covered by the RFC parsers.
const ZONED_FORMATS: &[&str] = &["%d %b %Y %H:%M:%S %z"];

/// Zone-less datetimes, interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%d %b %Y %H:%M:%S"];

/// Date-only forms, interpreted as midnight UTC.
const DATE_ONLY_FORMATS: &[&str] = &["%a, %d %b %Y", "%Y-%m-%d", "%B %d, %Y", "%b %d, %Y"];

pub fn parse_published_at(raw: &str) -> Result<DateTime<Utc>, UnparseableDate> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(UnparseableDate(raw.to_string()));
    }

    // RFC 2822 covers the RFC-1123 shapes with both numeric and named zones
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in ZONED_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&parsed));
        }
    }
    for format in DATE_ONLY_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&parsed.and_time(NaiveTime::MIN)));
        }
    }

    Err(UnparseableDate(value.to_string()))
}
