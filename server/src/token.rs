//! Rotating token format: `<bus_no>_<RFC 3339 UTC timestamp>`.

use chrono::{DateTime, SecondsFormat, Utc};

const SEPARATOR: char = '_';

/// A bus number must survive [`split`], so it may not contain the separator.
pub fn is_valid_bus_no(bus_no: &str) -> bool {
    !bus_no.trim().is_empty() && !bus_no.contains(SEPARATOR)
}

pub fn mint(bus_no: &str, now: DateTime<Utc>) -> String {
    format!("{bus_no}_{}", now.to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// Splits on the first `_`. Both halves must be non-empty.
pub fn split(raw: &str) -> Option<(&str, &str)> {
    raw.split_once(SEPARATOR)
        .filter(|(bus_no, issued)| !bus_no.is_empty() && !issued.is_empty())
}

pub fn issued_at(issued: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(issued)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// A token is fresh while its age, in either direction, is within `max_age_seconds`.
pub fn is_fresh(issued: DateTime<Utc>, now: DateTime<Utc>, max_age_seconds: i64) -> bool {
    (now - issued).num_seconds().abs() <= max_age_seconds
}
