//! Date formatting for the `es-PE` locale.
//!
//! The backend emits three shapes: plain dates (`2024-01-15`), naive
//! ISO datetimes with optional fractional seconds (`2024-01-15T14:30:00.123`)
//! and, occasionally, RFC 3339 with an offset. All are rendered in the
//! short Peruvian style. Input that matches none of them is returned as-is.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

const MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "set", "oct", "nov", "dic",
];

fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn month_name(month0: u32) -> &'static str {
    usize::try_from(month0)
        .ok()
        .and_then(|i| MONTHS.get(i))
        .copied()
        .unwrap_or("")
}

/// `"15 ene 2024"`, used by news, notifications and profile lists.
#[must_use]
pub fn format_date(raw: &str) -> String {
    parse(raw).map_or_else(
        || raw.to_owned(),
        |dt| format!("{} {} {}", dt.day(), month_name(dt.month0()), dt.year()),
    )
}

/// `"15 ene, 14:30"`, used by map markers.
#[must_use]
pub fn format_date_time(raw: &str) -> String {
    parse(raw).map_or_else(
        || raw.to_owned(),
        |dt| {
            format!(
                "{} {}, {:02}:{:02}",
                dt.day(),
                month_name(dt.month0()),
                dt.hour(),
                dt.minute()
            )
        },
    )
}
