mod config;
mod consts;
mod error;
mod navigator;
mod prelude;
mod range;
mod selector;
pub mod sim;
mod types;
mod verifier;
#[cfg(feature = "webdriver")]
pub mod webdriver;
mod widget;

pub use config::{ConfigError, PickerConfig};
pub use consts::*;
pub use error::{BoxError, CalendarError};
pub use navigator::{
    CalendarNavigator, NavigationDirection, NavigationReport, SettlePolicy, navigate_to_month,
};
pub use range::{DateRange, RangeError};
pub use selector::select_day;
pub use types::{Day, Month, Year, YearMonth, days_in_month, is_leap_year};
pub use verifier::{
    ContiguityCheck, DerivedStateVerifier, SelectionVerifier, Verification, VerificationResult,
    WidgetStateVerifier, verify_selection,
};
pub use widget::{CalendarWidget, DerivedStateReader, StructuredDateParams};

use chrono::{Datelike, Local, NaiveDate};
use crate::prelude::*;
use std::str::FromStr;
use types::parse_number;

/// A concrete day on the calendar.
///
/// Values only exist for dates that are on the calendar: 31 February can't be
/// built, and nothing is ever rolled over into the following month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct CalendarDate {
    year: Year,
    month: Month,
    day: Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// Textual encodings a `CalendarDate` can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `15/07/2025`
    DayMonthYear,
    /// `2025-07-15`
    Iso,
    /// `2025/07/15`
    YearSlash,
    /// `July 15, 2025`
    LongMonth,
    /// `15`; only meaningful relative to the current month
    BareDay,
}

impl CalendarDate {
    /// Creates a date from raw numbers, rejecting dates that don't exist.
    ///
    /// # Errors
    /// Returns the `ParseError` variant for the first out-of-range component.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        let year_nz = Year::new(year)?;
        let month_nz = Month::new(month)?;
        let day_nz = Day::new(day, year, month)?;

        // chrono refuses to build dates that don't exist; it must agree with the table
        if NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day)).is_none() {
            return Err(ParseError::InvalidDay { month, day, year });
        }

        Ok(Self {
            year: year_nz,
            month: month_nz,
            day: day_nz,
        })
    }

    /// Creates a date from already validated components.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if `day` does not exist in that month.
    pub fn from_parts(year: Year, month: Month, day: Day) -> Result<Self, ParseError> {
        Self::new(year.get(), month.get(), day.get())
    }

    /// The local calendar date right now.
    ///
    /// # Errors
    /// Returns `ParseError` only if the system clock is outside `1..=MAX_YEAR`.
    pub fn today() -> Result<Self, ParseError> {
        Self::from_naive(Local::now().date_naive())
    }

    /// Converts a chrono date.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` for years outside `1..=MAX_YEAR`.
    pub fn from_naive(date: NaiveDate) -> Result<Self, ParseError> {
        let year = u16::try_from(date.year())
            .map_err(|_| ParseError::InvalidFormat(format!("Year out of range: {}", date.year())))?;
        // chrono guarantees month in 1..=12 and day in 1..=31
        let month = u8::try_from(date.month()).map_err(|_| ParseError::InvalidMonth(0))?;
        let day = u8::try_from(date.day()).map_err(|_| ParseError::InvalidDay { month, day: 0, year })?;
        Self::new(year, month, day)
    }

    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year.get()),
            u32::from(self.month.get()),
            u32::from(self.day.get()),
        )
    }

    pub const fn year(&self) -> Year {
        self.year
    }

    pub const fn month(&self) -> Month {
        self.month
    }

    pub const fn day(&self) -> Day {
        self.day
    }

    /// The calendar page this date sits on.
    pub const fn year_month(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }

    /// The label a date-picker renders for this date's cell ("7", not "07").
    pub fn day_label(&self) -> String {
        self.day.get().to_string()
    }

    /// The following day, or `None` past the last day of `MAX_YEAR`.
    pub fn succ(&self) -> Option<Self> {
        if self.day.get() < days_in_month(self.year.get(), self.month.get()) {
            return Self::new(self.year.get(), self.month.get(), self.day.get() + 1).ok();
        }
        let next = self.year_month().succ()?;
        Self::new(next.year().get(), next.month().get(), MIN_DAY).ok()
    }

    /// Writes the date in one of the accepted textual encodings.
    pub fn format(&self, format: DateFormat) -> String {
        let (year, month, day) = (self.year.get(), self.month.get(), self.day.get());
        match format {
            DateFormat::DayMonthYear => format!("{day:02}/{month:02}/{year:04}"),
            DateFormat::Iso => self.to_string(),
            DateFormat::YearSlash => format!("{year:04}/{month:02}/{day:02}"),
            DateFormat::LongMonth => format!("{} {day}, {year:04}", self.month.name()),
            DateFormat::BareDay => day.to_string(),
        }
    }
}

/// Parses date text with bare days resolved against the local clock.
///
/// See [`parse_date_relative`] for the accepted forms.
///
/// # Errors
/// Returns `ParseError` when the text matches no accepted form or names a day
/// that does not exist.
pub fn parse_date(text: &str) -> Result<CalendarDate, ParseError> {
    parse_date_relative(text, CalendarDate::today()?)
}

/// Parses date text, resolving a bare day-of-month against `today`.
///
/// Accepted forms:
/// - `15` (day of `today`'s month)
/// - `2025-07-15`
/// - `2025/07/15` (first segment has four characters)
/// - `15/07/2025` (any other slash form is day first)
/// - `July 15, 2025` and `15 July 2025`
///
/// # Errors
/// Returns `ParseError` when the text matches no accepted form or names a day
/// that does not exist.
pub fn parse_date_relative(text: &str, today: CalendarDate) -> Result<CalendarDate, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let has_hyphen = trimmed.contains(DATE_SEPARATOR);
    let has_slash = trimmed.contains(SLASH_SEPARATOR);

    if has_hyphen && has_slash {
        return Err(ParseError::InvalidFormat(format!(
            "Mixed delimiters ({DATE_SEPARATOR} and {SLASH_SEPARATOR})"
        )));
    }

    if has_hyphen {
        let parts = split_three(trimmed, DATE_SEPARATOR)?;
        return parse_year_first(&parts);
    }

    if has_slash {
        let parts = split_three(trimmed, SLASH_SEPARATOR)?;
        return if parts[0].len() == YEAR_SEGMENT_LEN {
            parse_year_first(&parts)
        } else {
            parse_day_first(&parts)
        };
    }

    if trimmed.len() <= 2 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let day = parse_number::<u8>(trimmed)?;
        return CalendarDate::new(today.year.get(), today.month.get(), day);
    }

    parse_long_month(trimmed)
}

fn split_three(s: &str, separator: char) -> Result<[&str; 3], ParseError> {
    let parts: Vec<&str> = s.split(separator).map(str::trim).collect();
    match parts.as_slice() {
        [a, b, c] => Ok([*a, *b, *c]),
        _ => Err(ParseError::InvalidFormat(format!(
            "Expected 2 {separator} separators, found {}: {s}",
            parts.len() - 1
        ))),
    }
}

fn parse_year_first(parts: &[&str; 3]) -> Result<CalendarDate, ParseError> {
    if parts[0].len() != YEAR_SEGMENT_LEN {
        return Err(ParseError::InvalidFormat(format!(
            "Expected a four-digit year first: {}",
            parts[0]
        )));
    }
    let year = parse_number::<u16>(parts[0])?;
    let month = parse_number::<u8>(parts[1])?;
    let day = parse_number::<u8>(parts[2])?;
    CalendarDate::new(year, month, day)
}

fn parse_day_first(parts: &[&str; 3]) -> Result<CalendarDate, ParseError> {
    if parts[2].len() != YEAR_SEGMENT_LEN {
        return Err(ParseError::InvalidFormat(format!(
            "Expected a four-digit year last: {}",
            parts[2]
        )));
    }
    let day = parse_number::<u8>(parts[0])?;
    let month = parse_number::<u8>(parts[1])?;
    let year = parse_number::<u16>(parts[2])?;
    CalendarDate::new(year, month, day)
}

/// The `YYYY-MM-DD` form only, as `CalendarDate` displays itself.
pub(crate) fn parse_iso(text: &str) -> Result<CalendarDate, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    parse_year_first(&split_three(trimmed, DATE_SEPARATOR)?)
}

/// `July 15, 2025` or `15 July 2025`
fn parse_long_month(s: &str) -> Result<CalendarDate, ParseError> {
    let tokens: Vec<&str> = s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    let (month, day, year) = match tokens.as_slice() {
        [first, second, year] if first.starts_with(|c: char| c.is_ascii_alphabetic()) => {
            (*first, *second, *year)
        }
        [first, second, year] => (*second, *first, *year),
        _ => return Err(ParseError::InvalidFormat(s.to_owned())),
    };

    if year.len() != YEAR_SEGMENT_LEN {
        return Err(ParseError::InvalidFormat(format!("Expected a four-digit year: {s}")));
    }
    let month = Month::from_name(month).map_err(|_| ParseError::InvalidFormat(s.to_owned()))?;
    let day = parse_number::<u8>(day)?;
    let year = parse_number::<u16>(year)?;
    CalendarDate::new(year, month.get(), day)
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_date(s)
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_iso(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;

    pub fn date(year: u16, month: u8, day: u8) -> CalendarDate {
        CalendarDate::new(year, month, day).unwrap()
    }

    pub fn page(year: u16, month: u8) -> YearMonth {
        YearMonth::from_numbers(year, month).unwrap()
    }

    pub fn range(start: CalendarDate, end: CalendarDate) -> DateRange {
        DateRange::new(start, end).unwrap()
    }
}
