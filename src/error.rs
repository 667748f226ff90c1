//! Failures raised while driving a calendar widget.

use crate::{ParseError, RangeError, YearMonth};

/// Boxed error from whatever automation layer backs a widget.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Conditions that stop a navigation, selection or verification.
///
/// A verification mismatch is not here: it comes back as data in
/// [`crate::VerificationResult`].
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    /// The header label matched no known month/year format.
    #[error("Calendar header {label:?} is not a month/year label: {source}")]
    WidgetStateUnparseable {
        label: String,
        #[source]
        source: ParseError,
    },

    /// The target page was not reached within the iteration bound.
    #[error(
        "Could not navigate to {target} within {iterations} steps (last header: {last_label:?})"
    )]
    NavigationExhausted {
        target: YearMonth,
        last_label: String,
        iterations: u32,
    },

    /// No in-month cell carries the requested day.
    #[error("No in-month cell for day {day} (calendar showing {displayed:?})")]
    DayCellNotFound { day: u8, displayed: Option<String> },

    /// The requested date was rejected before any widget interaction.
    #[error(transparent)]
    InvalidDateFormat(#[from] ParseError),

    #[error(transparent)]
    InvalidRange(#[from] RangeError),

    /// The automation layer behind the widget failed.
    #[error("Widget driver error: {0}")]
    Driver(#[source] BoxError),
}

impl CalendarError {
    /// Wraps an automation-layer error.
    pub fn driver<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Driver(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::page;

    #[test]
    fn test_exhausted_message_carries_context() {
        let err = CalendarError::NavigationExhausted {
            target: page(2025, 7),
            last_label: "March 2025".to_owned(),
            iterations: 3,
        };
        assert_eq!(
            err.to_string(),
            r#"Could not navigate to July 2025 within 3 steps (last header: "March 2025")"#
        );
    }

    #[test]
    fn test_parse_error_converts() {
        let err: CalendarError = ParseError::EmptyInput.into();
        assert!(matches!(err, CalendarError::InvalidDateFormat(ParseError::EmptyInput)));
        assert_eq!(err.to_string(), "Empty date string");
    }

    #[test]
    fn test_driver_wraps_strings() {
        let err = CalendarError::driver("stale element");
        assert_eq!(err.to_string(), "Widget driver error: stale element");
        assert!(std::error::Error::source(&err).is_some());
    }
}
