/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month
pub const MIN_DAY: u8 = 1;

/// Largest day label any month can render
pub const MAX_DAY_LABEL: u8 = 31;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// English month names as rendered in calendar headers (index 0 unused)
pub const MONTH_NAMES: [&str; 13] = [
    "",
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

/// Length of the abbreviated month names some widgets render ("Jul 2025")
pub const MONTH_ABBREVIATION_LEN: usize = 3;

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
/// Range separator (ISO 8601 extended format)
pub const RANGE_SEPARATOR: char = '/';
/// Separator for the day-first (`DD/MM/YYYY`) and `YYYY/MM/DD` forms
pub const SLASH_SEPARATOR: char = '/';
/// Segment length that marks the year-first slash form
pub const YEAR_SEGMENT_LEN: usize = 4;

/// Navigation attempts allowed before giving up on reaching a month
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;
/// How long to wait for the header label to change after a navigation click
pub const DEFAULT_SETTLE_TIMEOUT_MS: u64 = 2_000;
/// Interval between header label reads while waiting for a re-render
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Query parameter carrying the check-in date on the reservation view
pub const CHECK_IN_PARAM: &str = "checkin";
/// Query parameter carrying the check-out date on the reservation view
pub const CHECK_OUT_PARAM: &str = "checkout";
