//! Timestamp parsing for event records.
//!
//! Input files come from different exporters, so without an explicit format
//! we try a fixed list of common encodings. Offset-carrying timestamps are
//! converted to UTC and stored naive.

use crate::utils::config::{DATE_ONLY_FORMAT, NAIVE_TIMESTAMP_FORMATS};
use crate::utils::error::TimestampError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a timestamp, either with an explicit format or by auto-detection
///
/// # Errors
/// * `TimestampError::Empty` - blank value
/// * `TimestampError::FormatMismatch` - value does not match the explicit format
/// * `TimestampError::Unrecognized` - no auto-detected format matches
pub fn parse_timestamp(
    value: &str,
    format: Option<&str>,
) -> Result<NaiveDateTime, TimestampError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TimestampError::Empty);
    }

    match format {
        Some(fmt) => parse_with_format(value, fmt),
        None => detect_and_parse(value),
    }
}

fn parse_with_format(value: &str, fmt: &str) -> Result<NaiveDateTime, TimestampError> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, fmt) {
        return Ok(ts);
    }
    DateTime::parse_from_str(value, fmt)
        .map(|dt| dt.naive_utc())
        .map_err(|source| TimestampError::FormatMismatch {
            format: fmt.to_string(),
            source,
        })
}

fn detect_and_parse(value: &str) -> Result<NaiveDateTime, TimestampError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Ok(dt.naive_utc());
    }

    if let Some(ts) = NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Ok(ts);
    }

    NaiveDate::parse_from_str(value, DATE_ONLY_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or(TimestampError::Unrecognized)
}
