//! Memory search date parsing
//!
//! Users search past entries by typing a date. Accepted forms are
//! month, day, and year separated by `-`, `/`, or whitespace (`3-14-2022`,
//! `03/14/22`, `3 14 2022`), or the words `today` and `yesterday`.
//! Two-digit years take the current century.

use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

/// First year an entry can exist in
pub const FIRST_SEARCHABLE_YEAR: i32 = 2021;

/// Reasons a memory search query is rejected
///
/// The messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryQueryError {
    #[error("Input must be comprised of the year, month, and date")]
    WrongPartCount,

    #[error("Input must be formatted using only '-', '/', ' ', and numbers")]
    NotNumeric,

    #[error("Invalid length for month")]
    MonthLength,

    #[error("Invalid value for month")]
    MonthValue,

    #[error("Invalid length for day")]
    DayLength,

    #[error("Invalid value for day")]
    DayValue,

    #[error("Invalid length for year")]
    YearLength,

    #[error("Invalid value for year")]
    YearValue,

    #[error("Invalid date")]
    NotOnCalendar,
}

/// Parse a memory search query relative to `today`
pub fn parse_memory_query(input: &str, today: NaiveDate) -> Result<NaiveDate, MemoryQueryError> {
    let trimmed = input.trim();

    let normalized = if trimmed.eq_ignore_ascii_case("today") {
        today.format("%m %d %Y").to_string()
    } else if trimmed.eq_ignore_ascii_case("yesterday") {
        (today - Duration::days(1)).format("%m %d %Y").to_string()
    } else {
        trimmed.to_string()
    };

    let parts: Vec<&str> = if normalized.contains('-') {
        normalized.split('-').collect()
    } else if normalized.contains('/') {
        normalized.split('/').collect()
    } else {
        normalized.split_whitespace().collect()
    };

    if parts.len() != 3 {
        return Err(MemoryQueryError::WrongPartCount);
    }
    if parts
        .iter()
        .any(|part| part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(MemoryQueryError::NotNumeric);
    }

    let month = zero_pad(parts[0], 2);
    if month.len() != 2 {
        return Err(MemoryQueryError::MonthLength);
    }
    let month: u32 = parse_digits(&month)?;
    if !(1..=12).contains(&month) {
        return Err(MemoryQueryError::MonthValue);
    }

    let day = zero_pad(parts[1], 2);
    if day.len() != 2 {
        return Err(MemoryQueryError::DayLength);
    }
    let day: u32 = parse_digits(&day)?;
    if !(1..=31).contains(&day) {
        return Err(MemoryQueryError::DayValue);
    }

    let year_text = parts[2];
    let year_text = match year_text.len() {
        2 => format!("{}{}", today.year() / 100, year_text),
        4 => year_text.to_string(),
        _ => return Err(MemoryQueryError::YearLength),
    };
    let year: i32 = parse_digits(&year_text)?;
    if year < FIRST_SEARCHABLE_YEAR || year > today.year() {
        return Err(MemoryQueryError::YearValue);
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or(MemoryQueryError::NotOnCalendar)
}

/// Long human-readable form, e.g. "Monday March 14, 2022"
pub fn readable_date(date: NaiveDate) -> String {
    date.format("%A %B %d, %Y").to_string()
}

fn zero_pad(digits: &str, width: usize) -> String {
    format!("{:0>width$}", digits, width = width)
}

fn parse_digits<T: std::str::FromStr>(digits: &str) -> Result<T, MemoryQueryError> {
    digits.parse().map_err(|_| MemoryQueryError::NotNumeric)
}
