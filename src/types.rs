use crate::ParseError;
use crate::consts::{
    CENTURY_CYCLE, DATE_SEPARATOR, DAYS_IN_MONTH, DECEMBER, FEBRUARY, FEBRUARY_DAYS_LEAP,
    GREGORIAN_CYCLE, JANUARY, LEAP_YEAR_CYCLE, MAX_MONTH, MAX_YEAR, MONTH_ABBREVIATION_LEN,
    MONTH_NAMES,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;
use std::num::NonZeroU16;
use std::str::FromStr;

/// A year value guaranteed to be in the range `1..=MAX_YEAR` (1..=9999)
/// Uses `NonZeroU16` internally, so 0 is not a valid year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Creates a new Year, validating that it's non-zero and <= `MAX_YEAR`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the value is 0 or > `MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, ParseError> {
        let non_zero = NonZeroU16::new(value).ok_or(ParseError::InvalidYear(value))?;
        if value > MAX_YEAR {
            return Err(ParseError::InvalidYear(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the year value as u16
    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl TryFrom<u16> for Year {
    type Error = ParseError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(ParseError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Long-form English name, as calendar headers render it ("July")
    pub const fn name(self) -> &'static str {
        MONTH_NAMES[self.0.get() as usize]
    }

    /// Looks a month up by its English name.
    ///
    /// Matching ignores case and accepts the long form ("July") or the
    /// three-letter abbreviation ("Jul").
    ///
    /// # Errors
    /// Returns `ParseError::InvalidFormat` if the name is not a month.
    pub fn from_name(name: &str) -> Result<Self, ParseError> {
        let wanted = name.trim().to_ascii_lowercase();
        let index = MONTH_NAMES
            .iter()
            .skip(1)
            .position(|candidate| {
                let candidate = candidate.to_ascii_lowercase();
                candidate == wanted
                    || (wanted.len() == MONTH_ABBREVIATION_LEN && candidate.starts_with(&wanted))
            })
            .ok_or_else(|| ParseError::InvalidFormat(format!("Unknown month name: {name}")))?;
        // position() is 0-based over January..=December
        let number = u8::try_from(index + 1)
            .map_err(|_| ParseError::InvalidFormat(format!("Unknown month name: {name}")))?;
        Self::new(number)
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day value guaranteed to be valid for a given year and month
/// Uses `NonZeroU8` internally, so 0 is not a valid day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it's non-zero and valid for the given year and month
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0 or invalid for the given year and month.
    pub fn new(value: u8, year: u16, month: u8) -> Result<Self, ParseError> {
        let invalid = ParseError::InvalidDay {
            month,
            day: value,
            year,
        };
        let non_zero = NonZeroU8::new(value).ok_or_else(|| invalid.clone())?;

        if month == 0 || month > MAX_MONTH || value > days_in_month(year, month) {
            return Err(invalid);
        }

        Ok(Self(non_zero))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // Can't validate against a month here, so only the lower bound is checked
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidDay {
            month: 0,
            day: value,
            year: 0,
        })?;
        Ok(Self(non_zero))
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A calendar page: the month a date-picker header shows.
///
/// Ordering is linear, year first and month second, so comparing two values
/// tells which way a widget has to page to get from one to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: Year,
    month: Month,
}

impl YearMonth {
    pub const fn new(year: Year, month: Month) -> Self {
        Self { year, month }
    }

    /// Builds a page from raw numbers.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` or `ParseError::InvalidMonth` when out of range.
    pub fn from_numbers(year: u16, month: u8) -> Result<Self, ParseError> {
        Ok(Self {
            year: Year::new(year)?,
            month: Month::new(month)?,
        })
    }

    pub const fn year(self) -> Year {
        self.year
    }

    pub const fn month(self) -> Month {
        self.month
    }

    /// The following month, or `None` past December of `MAX_YEAR`.
    pub fn succ(self) -> Option<Self> {
        let (year, month) = if self.month.get() == DECEMBER {
            (self.year.get().checked_add(1)?, JANUARY)
        } else {
            (self.year.get(), self.month.get() + 1)
        };
        Self::from_numbers(year, month).ok()
    }

    /// The preceding month, or `None` before January of year 1.
    pub fn pred(self) -> Option<Self> {
        let (year, month) = if self.month.get() == JANUARY {
            (self.year.get().checked_sub(1)?, DECEMBER)
        } else {
            (self.year.get(), self.month.get() - 1)
        };
        Self::from_numbers(year, month).ok()
    }

    /// Signed number of month steps from `self` to `other`.
    pub fn months_until(self, other: Self) -> i32 {
        other.ordinal() - self.ordinal()
    }

    /// Number of days on this page.
    pub const fn days(self) -> u8 {
        days_in_month(self.year.get(), self.month.get())
    }

    fn ordinal(self) -> i32 {
        i32::from(self.year.get()) * i32::from(MAX_MONTH) + i32::from(self.month.get()) - 1
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month.name(), self.year)
    }
}

/// Parses a calendar header label.
///
/// Accepts `"July 2025"`, `"jul 2025"` and ISO `"2025-07"`.
impl FromStr for YearMonth {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        if let Some((year, month)) = trimmed.split_once(DATE_SEPARATOR) {
            let year = parse_number::<u16>(year.trim())?;
            let month = parse_number::<u8>(month.trim())?;
            return Self::from_numbers(year, month);
        }

        let mut tokens = trimmed.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(month), Some(year), None) => Ok(Self {
                month: Month::from_name(month)?,
                year: Year::new(parse_number::<u16>(year)?)?,
            }),
            _ => Err(ParseError::InvalidFormat(format!(
                "Expected '<month name> <year>': {trimmed}"
            ))),
        }
    }
}

/// Parses an unsigned decimal component, mapping failures to `InvalidFormat`.
pub(crate) fn parse_number<T: FromStr>(s: &str) -> Result<T, ParseError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidFormat(s.to_owned()));
    }
    s.parse::<T>()
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

/// Days in `month` of `year`; zero when `month` is not a calendar month.
pub const fn days_in_month(year: u16, month: u8) -> u8 {
    if month == 0 || month > MAX_MONTH {
        return 0;
    }

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: u16, month: u8) -> YearMonth {
        YearMonth::from_numbers(year, month).unwrap()
    }

    #[test]
    fn test_year_new_valid() {
        assert!(Year::new(1).is_ok());
        assert!(Year::new(2025).is_ok());
        assert!(Year::new(9999).is_ok());
    }

    #[test]
    fn test_year_new_invalid() {
        assert!(matches!(Year::new(0), Err(ParseError::InvalidYear(0))));
        assert!(matches!(Year::new(10000), Err(ParseError::InvalidYear(10000))));
    }

    #[test]
    fn test_year_serde() {
        let year = Year::new(2025).unwrap();
        let json = serde_json::to_string(&year).unwrap();
        assert_eq!(json, "2025");

        let parsed: Year = serde_json::from_str(&json).unwrap();
        assert_eq!(year, parsed);
        assert!(serde_json::from_str::<Year>("0").is_err());
    }

    #[test]
    fn test_month_new() {
        for m in 1..=12 {
            assert!(Month::new(m).is_ok(), "Month {m} should be valid");
        }
        assert!(matches!(Month::new(0), Err(ParseError::InvalidMonth(0))));
        assert!(matches!(Month::new(13), Err(ParseError::InvalidMonth(13))));
    }

    #[test]
    fn test_month_name_lookup_both_directions() {
        for m in 1..=12 {
            let month = Month::new(m).unwrap();
            assert_eq!(Month::from_name(month.name()).unwrap(), month);
        }
        assert_eq!(Month::new(7).unwrap().name(), "July");
        assert_eq!(Month::from_name("july").unwrap().get(), 7);
        assert_eq!(Month::from_name("SEP").unwrap().get(), 9);
    }

    #[test]
    fn test_month_from_name_rejects_unknown() {
        assert!(matches!(Month::from_name("Juli"), Err(ParseError::InvalidFormat(_))));
        assert!(matches!(Month::from_name("Ju"), Err(ParseError::InvalidFormat(_))));
        assert!(matches!(Month::from_name(""), Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_day_new_valid() {
        assert!(Day::new(31, 2025, 1).is_ok());
        assert!(Day::new(28, 2025, 2).is_ok());
        assert!(Day::new(29, 2025, 2).is_err());
        assert!(Day::new(29, 2024, 2).is_ok());
        assert!(Day::new(30, 2025, 4).is_ok());
        assert!(Day::new(31, 2025, 4).is_err());
    }

    #[test]
    fn test_day_new_invalid() {
        assert!(matches!(Day::new(0, 2025, 1), Err(ParseError::InvalidDay { .. })));
        assert!(matches!(
            Day::new(32, 2025, 1),
            Err(ParseError::InvalidDay {
                month: 1,
                day: 32,
                year: 2025
            })
        ));
        assert!(matches!(Day::new(1, 2025, 13), Err(ParseError::InvalidDay { .. })));
    }

    #[test]
    fn test_day_try_from_u8() {
        let day: Day = 15.try_into().unwrap();
        assert_eq!(day.get(), 15);

        let result: Result<Day, _> = 0.try_into();
        assert!(result.is_err());
    }

    #[test]
    fn test_year_month_ordering_is_year_major() {
        assert!(ym(2024, 12) < ym(2025, 1));
        assert!(ym(2025, 1) < ym(2025, 7));
        assert!(ym(2026, 1) > ym(2025, 12));
    }

    #[test]
    fn test_year_month_succ_pred() {
        assert_eq!(ym(2025, 12).succ(), Some(ym(2026, 1)));
        assert_eq!(ym(2025, 1).pred(), Some(ym(2024, 12)));
        assert_eq!(ym(2025, 6).succ(), Some(ym(2025, 7)));
        assert_eq!(ym(9999, 12).succ(), None);
        assert_eq!(ym(1, 1).pred(), None);
    }

    #[test]
    fn test_year_month_distance() {
        assert_eq!(ym(2025, 1).months_until(ym(2025, 7)), 6);
        assert_eq!(ym(2025, 7).months_until(ym(2025, 1)), -6);
        assert_eq!(ym(2024, 11).months_until(ym(2025, 2)), 3);
        assert_eq!(ym(2025, 3).months_until(ym(2025, 3)), 0);
    }

    #[test]
    fn test_year_month_label_round_trip() {
        let page = ym(2025, 7);
        assert_eq!(page.to_string(), "July 2025");
        assert_eq!("July 2025".parse::<YearMonth>().unwrap(), page);
        assert_eq!("  jul   2025 ".parse::<YearMonth>().unwrap(), page);
        assert_eq!("2025-07".parse::<YearMonth>().unwrap(), page);
    }

    #[test]
    fn test_year_month_label_rejects_garbage() {
        assert!(matches!("".parse::<YearMonth>(), Err(ParseError::EmptyInput)));
        assert!("July".parse::<YearMonth>().is_err());
        assert!("July 2025 extra".parse::<YearMonth>().is_err());
        assert!("Juli 2025".parse::<YearMonth>().is_err());
        assert!("July 20x5".parse::<YearMonth>().is_err());
        assert!("2025-13".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_year_month_days() {
        assert_eq!(ym(2024, 2).days(), 29);
        assert_eq!(ym(2025, 2).days(), 28);
        assert_eq!(ym(2025, 7).days(), 31);
    }

    #[test]
    fn test_parse_number_rejects_signs_and_spaces() {
        assert!(parse_number::<u8>("+5").is_err());
        assert!(parse_number::<u8>(" 5").is_err());
        assert!(parse_number::<u8>("").is_err());
        assert_eq!(parse_number::<u8>("07").unwrap(), 7);
    }

    #[test]
    fn test_is_leap_year_cases() {
        struct TestCase {
            year: u16,
            is_leap: bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                year: 2024,
                is_leap: true,
                description: "divisible by 4",
            },
            TestCase {
                year: 2025,
                is_leap: false,
                description: "not divisible by 4",
            },
            TestCase {
                year: 1900,
                is_leap: false,
                description: "century not divisible by 400",
            },
            TestCase {
                year: 2000,
                is_leap: true,
                description: "divisible by 400",
            },
        ];

        for case in &cases {
            assert_eq!(
                is_leap_year(case.year),
                case.is_leap,
                "Year {} ({})",
                case.year,
                case.description
            );
        }
    }

    #[test]
    fn test_days_in_month_table() {
        let expected = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for month in 1..=12 {
            assert_eq!(
                days_in_month(2025, month),
                expected[month as usize],
                "Month {month} has incorrect day count"
            );
        }
        assert_eq!(days_in_month(2024, 2), 29);
    }

    #[test]
    fn test_days_in_month_out_of_range_month() {
        assert_eq!(days_in_month(2025, 0), 0);
        assert_eq!(days_in_month(2025, 13), 0);
        assert_eq!(days_in_month(2025, u8::MAX), 0);
    }
}
