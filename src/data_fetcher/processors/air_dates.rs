//! Air-date parsing and past/future classification
//!
//! Upstream publishes air dates as US-style display strings like
//! `"September 29, 2021"`. Only that exact shape is accepted; everything
//! else (ISO dates, partial dates, empty values) reads as "no date" and
//! the episode is excluded from past/future classification. That keeps a
//! half-scraped feed from flipping an episode into the wrong bucket.

use chrono::NaiveDate;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Whether an episode's air date lies on/before or after the reference
/// date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirStatus {
    /// Air date on or before the reference date. A same-day episode
    /// counts as already aired.
    Aired,
    Upcoming,
}

/// Parses a strict `"<FullMonthName> <Day>, <Year>"` date string.
///
/// The month name is matched case-insensitively, the day is 1-2 digits
/// followed by a comma, the year exactly 4 digits, with flexible
/// surrounding whitespace. A string that matches the shape but names an
/// impossible calendar date (`"February 31, 2021"`) is rejected too.
///
/// # Returns
/// * `Some(NaiveDate)` - the parsed calendar date
/// * `None` - anything that is not a valid date in this exact format
pub fn parse_air_date(raw: &str) -> Option<NaiveDate> {
    let mut tokens = raw.split_whitespace();
    let month_token = tokens.next()?;
    let day_token = tokens.next()?;
    let year_token = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    let month_lower = month_token.to_ascii_lowercase();
    let month = MONTH_NAMES
        .iter()
        .position(|name| *name == month_lower)
        .map(|idx| idx as u32 + 1)?;

    let day_digits = day_token.strip_suffix(',')?;
    if day_digits.is_empty()
        || day_digits.len() > 2
        || !day_digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let day: u32 = day_digits.parse().ok()?;

    if year_token.len() != 4 || !year_token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year_token.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Classifies a parsed air date against the reference date. Equality
/// counts as aired.
pub fn classify(air_date: NaiveDate, today: NaiveDate) -> AirStatus {
    if air_date <= today {
        AirStatus::Aired
    } else {
        AirStatus::Upcoming
    }
}
