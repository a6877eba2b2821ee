//! Timestamp helpers shared by the view pipelines

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Key used for timestamps that cannot be placed in a month
pub const UNKNOWN_MONTH: &str = "unknown";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Parse a backend timestamp
///
/// Accepts RFC 3339, the PostgreSQL text form (`2024-01-15 10:30:00.123+00`),
/// naive date-times (read as UTC) and bare dates (midnight UTC).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Some(ts.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `YYYY-MM` of an instant as seen in `tz`
#[must_use]
pub fn month_key<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> String {
    let local = instant.with_timezone(tz);
    format!("{}-{:02}", local.year(), local.month())
}

/// `YYYY-MM` of a raw backend timestamp, or [`UNKNOWN_MONTH`]
#[must_use]
pub fn month_key_of<Tz: TimeZone>(raw: Option<&str>, tz: &Tz) -> String {
    raw.and_then(parse_timestamp)
        .map_or_else(|| UNKNOWN_MONTH.to_string(), |ts| month_key(ts, tz))
}
