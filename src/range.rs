use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, ParseError, RANGE_SEPARATOR, prelude::*};

/// A stay between two calendar dates: check-in and check-out.
/// The end date is always strictly after the start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{start}/{end}")]
pub struct DateRange {
    start: CalendarDate,
    end:   CalendarDate,
}

/// Error type for date range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// End date is not after start date.
    #[error("Invalid date range: end ({end}) must be after start ({start})")]
    InvalidRange { start: CalendarDate, end: CalendarDate },

    /// Error parsing date component.
    #[error(transparent)]
    ParseError(#[from] ParseError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DateRange {
    /// Creates a new date range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if `end <= start`.
    pub fn new(start: CalendarDate, end: CalendarDate) -> Result<Self, RangeError> {
        if end <= start {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses both endpoints with [`crate::parse_date`] and validates their order.
    ///
    /// Invalid text fails here, before anything touches a widget.
    ///
    /// # Errors
    /// Returns `RangeError::ParseError` for unparseable text and
    /// `RangeError::InvalidRange` if the check-out is not after the check-in.
    pub fn parse_pair(check_in: &str, check_out: &str) -> Result<Self, RangeError> {
        let start = crate::parse_date(check_in)?;
        let end = crate::parse_date(check_out)?;
        Self::new(start, end)
    }

    /// Returns the check-in date
    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    /// Returns the check-out date
    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    /// Returns both dates as a tuple
    pub const fn dates(&self) -> (CalendarDate, CalendarDate) {
        (self.start, self.end)
    }

    /// Checks if the range contains a given date (both ends inclusive)
    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.start <= *date && *date <= self.end
    }

    /// Whether both endpoints sit on the same calendar page
    pub fn within_one_month(&self) -> bool {
        self.start.year_month() == self.end.year_month()
    }

    /// Every date from start to end, inclusive, in order
    pub fn days(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        std::iter::successors(Some(self.start), move |d| {
            d.succ().filter(|next| *next <= self.end)
        })
    }

    /// Number of nights between check-in and check-out
    pub fn nights(&self) -> usize {
        self.days().count() - 1
    }
}

impl FromStr for DateRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Each ISO endpoint is hyphenated, so the only slash is the range separator
        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();

        match separator_count {
            0 => Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (start_str, end_str) = trimmed.split_once(RANGE_SEPARATOR).ok_or_else(|| {
                    RangeError::InvalidFormat(format!(
                        "Separator '{RANGE_SEPARATOR}' not found despite count == 1"
                    ))
                })?;
                let start = parse_iso(start_str.trim())?;
                let end = parse_iso(end_str.trim())?;

                Self::new(start, end)
            },
            _ => Err(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

fn parse_iso(s: &str) -> Result<CalendarDate, RangeError> {
    if !s.contains(crate::DATE_SEPARATOR) {
        return Err(RangeError::InvalidFormat(format!("Expected YYYY-MM-DD endpoint: {s}")));
    }
    Ok(crate::parse_iso(s)?)
}

impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, range};

    #[test]
    fn test_new_range_cases() {
        struct TestCase {
            start:          CalendarDate,
            end:            CalendarDate,
            should_succeed: bool,
            description:    &'static str,
        }

        let cases = [
            TestCase {
                start:          date(2025, 7, 15),
                end:            date(2025, 7, 18),
                should_succeed: true,
                description:    "valid range (start < end)",
            },
            TestCase {
                start:          date(2025, 7, 18),
                end:            date(2025, 7, 15),
                should_succeed: false,
                description:    "invalid range (start > end)",
            },
            TestCase {
                start:          date(2025, 7, 15),
                end:            date(2025, 7, 15),
                should_succeed: false,
                description:    "equal dates are not a stay",
            },
            TestCase {
                start:          date(2025, 12, 30),
                end:            date(2026, 1, 2),
                should_succeed: true,
                description:    "range across a year boundary",
            },
        ];

        for case in &cases {
            let result = DateRange::new(case.start, case.end);
            if case.should_succeed {
                assert!(result.is_ok(), "Expected success for: {}", case.description);
            } else {
                assert!(
                    matches!(result, Err(RangeError::InvalidRange { .. })),
                    "Expected failure for: {}",
                    case.description
                );
            }
        }
    }

    #[test]
    fn test_accessors() {
        let start = date(2025, 7, 15);
        let end = date(2025, 7, 18);
        let stay = range(start, end);

        assert_eq!(stay.start(), start);
        assert_eq!(stay.end(), end);
        assert_eq!(stay.dates(), (start, end));
    }

    #[test]
    fn test_days_and_nights() {
        let stay = range(date(2025, 7, 15), date(2025, 7, 18));
        let labels: Vec<String> = stay.days().map(|d| d.day_label()).collect();
        assert_eq!(labels, ["15", "16", "17", "18"]);
        assert_eq!(stay.nights(), 3);

        let across = range(date(2025, 7, 30), date(2025, 8, 2));
        assert_eq!(across.days().count(), 4);
        assert!(!across.within_one_month());
        assert!(stay.within_one_month());
    }

    #[test]
    fn test_contains() {
        let stay = range(date(2025, 7, 15), date(2025, 7, 18));
        assert!(stay.contains(&date(2025, 7, 15)));
        assert!(stay.contains(&date(2025, 7, 16)));
        assert!(stay.contains(&date(2025, 7, 18)));
        assert!(!stay.contains(&date(2025, 7, 14)));
        assert!(!stay.contains(&date(2025, 8, 16)));
    }

    #[test]
    fn test_parse_pair() {
        let stay = DateRange::parse_pair("15/07/2025", "18/07/2025").unwrap();
        assert_eq!(stay, range(date(2025, 7, 15), date(2025, 7, 18)));

        assert!(matches!(
            DateRange::parse_pair("18/07/2025", "15/07/2025"),
            Err(RangeError::InvalidRange { .. })
        ));
        assert!(matches!(
            DateRange::parse_pair("31/02/2025", "03/03/2025"),
            Err(RangeError::ParseError(ParseError::InvalidDay { .. }))
        ));
    }

    #[test]
    fn test_display_and_from_str() {
        let stay = range(date(2025, 7, 15), date(2025, 7, 18));
        assert_eq!(stay.to_string(), "2025-07-15/2025-07-18");
        assert_eq!("2025-07-15/2025-07-18".parse::<DateRange>().unwrap(), stay);
        assert_eq!(" 2025-07-15 / 2025-07-18 ".parse::<DateRange>().unwrap(), stay);
    }

    #[test]
    fn test_from_str_errors() {
        let err = "2025-07-15".parse::<DateRange>().unwrap_err();
        assert!(err.to_string().contains("No range separator found"));

        let err = "2025-07-15/2025-07-16/2025-07-17".parse::<DateRange>().unwrap_err();
        assert!(err.to_string().contains("expected 1, found 2"));

        assert!("2025-07-18/2025-07-15".parse::<DateRange>().is_err());
        assert!("15/18".parse::<DateRange>().is_err());
    }

    #[test]
    fn test_ordering() {
        let first = range(date(2025, 7, 15), date(2025, 7, 18));
        let later = range(date(2025, 7, 16), date(2025, 7, 17));
        let longer = range(date(2025, 7, 15), date(2025, 7, 20));
        assert!(first < later);
        assert!(first < longer);
    }

    #[test]
    fn test_serde_string_format() {
        let stay = range(date(2025, 7, 15), date(2025, 7, 18));
        let json = serde_json::to_string(&stay).expect("failed to serialize range to JSON");
        assert_eq!(json, r#""2025-07-15/2025-07-18""#);

        let parsed: DateRange = serde_json::from_str(&json).expect("failed to deserialize range from JSON");
        assert_eq!(stay, parsed);
    }
}
