//! Timestamp parsing into comparable instants
//!
//! Accepts the forms registries and users actually write: RFC 3339
//! (`2020-01-01T00:00:00.000Z`), RFC 2822, naive date-times, plain
//! dates and the reduced ISO forms `YYYY-MM` and `YYYY`. Naive values are
//! read as UTC. Every parse is checked; nothing
//! falls back to a sentinel.

use crate::error::ResolveError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;

/// Naive date-time layouts tried after the zoned formats
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-only layout, read as midnight UTC
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(DateTime<Utc>);

impl Instant {
    /// Parse a timestamp string, failing with `InvalidTimestamp`
    pub fn parse(value: &str) -> Result<Self, ResolveError> {
        parse_timestamp(value)
    }

    /// The underlying UTC date-time
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl FromStr for Instant {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_timestamp(s)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// Parse `value` into an [`Instant`]
///
/// Surrounding whitespace is ignored. Empty input, garbage, and
/// calendar-invalid dates (e.g. `2021-02-30`) are rejected.
pub fn parse_timestamp(value: &str) -> Result<Instant, ResolveError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ResolveError::invalid_timestamp(value));
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Instant(datetime.with_timezone(&Utc)));
    }

    if let Ok(datetime) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(Instant(datetime.with_timezone(&Utc)));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Instant(naive.and_utc()));
        }
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .or_else(|| parse_reduced_date(trimmed))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Instant(naive.and_utc()))
        .ok_or_else(|| ResolveError::invalid_timestamp(value))
}

/// `YYYY-MM` or `YYYY`, read as the first day of the month or year
fn parse_reduced_date(value: &str) -> Option<NaiveDate> {
    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    let (year, month) = match value.split_once('-') {
        Some((year, month)) if digits(month, 2) => (year, month.parse().ok()?),
        Some(_) => return None,
        None => (value, 1),
    };
    if !digits(year, 4) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
}
