//! Timestamp parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::CoreError;

/// Formats that carry a numeric UTC offset (`+01:00` or `+0100`).
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y%m%dT%H%M%S%.f%z",
];

/// Formats without an offset, read as UTC. A trailing `Z` is stripped first.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

/// Date-only formats, read as midnight UTC.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Parses an ISO-8601 timestamp into UTC.
///
/// RFC 3339 values (`2022-01-01T00:00:00.000Z`, `2022-01-01T01:00:00+01:00`)
/// are converted to UTC. Minute precision, `+HHMM` offsets, the basic format
/// (`20220101T000000Z`) and plain dates are accepted too. Values without an
/// offset are read as UTC.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, CoreError> {
    let rfc_err = match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => return Ok(parsed.with_timezone(&Utc)),
        Err(e) => e,
    };

    let with_offset = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
        .map(|parsed| parsed.with_timezone(&Utc));
    if let Some(parsed) = with_offset {
        return Ok(parsed);
    }

    let naive = value.strip_suffix(['Z', 'z']).unwrap_or(value);
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CoreError::InvalidTimestamp {
            field,
            value: value.to_string(),
            reason: rfc_err.to_string(),
        })
}
