use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

use super::cell::CellValue;

/// An absolute point in time carrying the offset it was written with.
///
/// Equality and hashing compare the UTC instant, so `10:00+01:00` and
/// `09:00Z` are the same key.
pub type Instant = DateTime<FixedOffset>;

/// Date-time layouts that carry an explicit offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
];

/// Date-time layouts without an offset; these are read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Interpret a naive date-time at UTC+00:00.
pub fn instant_from_naive(naive: NaiveDateTime) -> Instant {
    Utc.fix().from_utc_datetime(&naive)
}

/// Parse an ISO-8601 style timestamp.
///
/// Accepts `T` or a single space between date and time, a trailing `Z` as
/// UTC, explicit `±HH:MM` / `±HHMM` offsets, optional seconds and fractional
/// seconds, and a bare date (midnight). Surrounding whitespace is not
/// stripped.
pub fn parse_instant(raw: &str) -> Option<Instant> {
    let mut text = raw.replacen(' ', "T", 1);
    if text.ends_with('Z') || text.ends_with('z') {
        text.pop();
        text.push_str("+00:00");
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&text, fmt) {
            return Some(dt);
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&text, fmt) {
            return Some(instant_from_naive(naive));
        }
    }

    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(instant_from_naive)
}

/// Read an instant out of a raw cell.
///
/// Native spreadsheet date-times are taken as-is; text goes through
/// [`parse_instant`]. Numbers and booleans are not timestamps.
pub fn instant_from_cell(cell: &CellValue) -> Option<Instant> {
    match cell {
        CellValue::DateTime(naive) => Some(instant_from_naive(*naive)),
        CellValue::Text(text) => parse_instant(text),
        CellValue::Int(_) | CellValue::Float(_) | CellValue::Bool(_) => None,
    }
}

/// Serde adapter writing instants as RFC 3339 with a numeric offset.
///
/// UTC comes out as `+00:00`, never `Z`. Use with `#[serde(with = "rfc3339")]`.
pub mod rfc3339 {
    use chrono::DateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::Instant;

    pub fn serialize<S: Serializer>(value: &Instant, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Instant, D::Error> {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text).map_err(de::Error::custom)
    }
}
