//! Date decomposition for date-derived text elements.
//!
//! The event date arrives as free text. The strict path understands
//! `"<day> <MonthName> <year>"` (the format the form suggests) and resolves
//! the weekday with UTC calendar math so the result never shifts by a day
//! across timezones. A handful of common alternative formats are accepted as
//! a fallback. Anything else yields `None`, and the caller simply omits the
//! date-derived elements.

use chrono::{Datelike, NaiveDate};

/// English month names, 0-indexed.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English weekday names, Sunday-first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Derived date components, produced once per render and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    pub day_name: String,
    pub date_number: String,
    pub month: String,
    pub year: String,
}

/// Decompose a loosely formatted date string into display components.
///
/// Returns `None` when no path yields a valid calendar date.
pub fn parse_date_parts(text: &str) -> Option<DateParts> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let date = parse_strict(trimmed).or_else(|| parse_fallback(trimmed))?;

    Some(DateParts {
        day_name: WEEKDAY_NAMES[date.weekday().num_days_from_sunday() as usize].to_string(),
        date_number: date.day().to_string(),
        month: MONTH_NAMES[date.month0() as usize].to_string(),
        year: date.year().to_string(),
    })
}

/// Strict `"<day> <MonthName> <year>"` parse, case-insensitive month name.
/// Trailing tokens after the year are ignored.
fn parse_strict(text: &str) -> Option<NaiveDate> {
    let mut tokens = text.split_whitespace();
    let day: u32 = tokens.next()?.parse().ok()?;
    let month_token = tokens.next()?;
    let year_token = tokens.next()?;

    if year_token.len() != 4 {
        return None;
    }
    let year: i32 = year_token.parse().ok()?;

    let month0 = MONTH_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(month_token))?;

    NaiveDate::from_ymd_opt(year, month0 as u32 + 1, day)
}

/// Lenient parse of common alternative formats.
const FALLBACK_FORMATS: [&str; 9] = [
    "%Y-%m-%d",  // 2026-02-19
    "%m/%d/%Y",  // 02/19/2026
    "%d-%m-%Y",  // 19-02-2026
    "%B %d, %Y", // February 19, 2026
    "%B %d %Y",  // February 19 2026
    "%d %B, %Y", // 19 February, 2026
    "%b %d, %Y", // Feb 19, 2026
    "%b %d %Y",  // Feb 19 2026
    "%d %b %Y",  // 19 Feb 2026
];

fn parse_fallback(text: &str) -> Option<NaiveDate> {
    FALLBACK_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}
