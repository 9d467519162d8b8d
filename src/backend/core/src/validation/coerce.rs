//! Lenient conversions for loosely-typed request fields.
//!
//! Form posts deliver numbers as strings and dates in whatever shape the
//! browser's date-time picker produced, so numeric and timestamp fields go
//! through these helpers before validation.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

/// Accepted naive date-time layouts, most specific first.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Coerce a JSON value to an integer.
///
/// Accepts integers, floats with no fractional part, and strings holding an
/// integer (surrounding whitespace ignored). Everything else is `None`.
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a timestamp from the API.
///
/// RFC 3339 values carrying an offset are converted to UTC before the offset
/// is dropped.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}
