//! Date-of-birth parsing and canonicalization.

use chrono::{Datelike, NaiveDate};

pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Accepted date layouts, tried in order: month-first, then day-first,
/// then month names, then year-first. Two-digit years come before four so
/// `1/2/05` is not read as year 5.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%m.%d.%y",
    "%m.%d.%Y",
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%d-%B-%y",
    "%d-%B-%Y",
    "%d %B %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
];

/// Years below this are misreads of short numeric fields.
const MIN_YEAR: i32 = 1000;

/// Parse a date of birth in any of the common roster layouts.
///
/// A trailing time of day ("1/2/2005 12:00:00 AM", "2005-01-02T00:00:00")
/// is ignored. Returns `None` for anything unrecognized.
pub fn parse_dob(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let date_part = strip_time(trimmed);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| {
            NaiveDate::parse_from_str(date_part, fmt)
                .ok()
                .filter(|d| d.year() >= MIN_YEAR)
        })
}

/// Canonical `YYYY-MM-DD` form of a date of birth, or `None` if unparseable.
pub fn standardize_dob(value: &str) -> Option<String> {
    parse_dob(value).map(|d| d.format(CANONICAL_FORMAT).to_string())
}

/// Cut a time-of-day suffix: the token holding the first `:` and everything
/// after it. The token starts after the last space or `T` before the colon.
fn strip_time(value: &str) -> &str {
    let Some(colon) = value.find(':') else {
        return value;
    };
    match value[..colon].rfind(|c: char| c == ' ' || c == 'T') {
        Some(idx) => value[..idx].trim_end(),
        None => value,
    }
}
