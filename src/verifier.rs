//! Reading a selection back and comparing it to the range that was asked for.
//!
//! A mismatch is data, not an error: every verifier returns a
//! [`VerificationResult`] and leaves the assertion to the caller. Only a
//! failing widget or reader produces `Err`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    CalendarDate, CalendarError, CalendarWidget, DateRange, DerivedStateReader, MAX_DAY_LABEL,
    MIN_DAY, PickerConfig, StructuredDateParams, parse_date, types::parse_number,
};

/// What to do with days inside a range that the widget does not mark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContiguityCheck {
    /// Only the endpoints are checked
    Off,
    /// Gaps are reported and logged but the selection still matches
    #[default]
    Lenient,
    /// Any gap fails the verification
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub matched: bool,
    /// Day labels the evidence source reported, normalized to unpadded numbers
    pub observed_dates: BTreeSet<String>,
    pub mismatch_detail: Option<String>,
    /// Days inside the expected range that were not marked
    pub gaps: Vec<CalendarDate>,
}

impl VerificationResult {
    fn mismatch(observed_dates: BTreeSet<String>, detail: String) -> Self {
        Self {
            matched: false,
            observed_dates,
            mismatch_detail: Some(detail),
            gaps: Vec::new(),
        }
    }
}

/// One source of evidence about which dates ended up selected.
#[async_trait]
pub trait SelectionVerifier: Send + Sync {
    /// # Errors
    /// Only when the underlying widget or reader fails.
    async fn verify(&self, expected: &DateRange) -> Result<VerificationResult, CalendarError>;
}

/// Checks the cells the widget itself marks as selected or in range.
#[derive(Debug)]
pub struct WidgetStateVerifier<'a, W: ?Sized> {
    widget: &'a W,
    contiguity: ContiguityCheck,
}

impl<'a, W: CalendarWidget + ?Sized> WidgetStateVerifier<'a, W> {
    pub const fn new(widget: &'a W, contiguity: ContiguityCheck) -> Self {
        Self { widget, contiguity }
    }
}

/// `"07"` and `" 7 "` both mean 7; anything that is not a day of month is dropped.
fn normalize_label(label: &str) -> Option<u8> {
    parse_number::<u8>(label.trim())
        .ok()
        .filter(|day| (MIN_DAY..=MAX_DAY_LABEL).contains(day))
}

#[async_trait]
impl<W: CalendarWidget + ?Sized> SelectionVerifier for WidgetStateVerifier<'_, W> {
    async fn verify(&self, expected: &DateRange) -> Result<VerificationResult, CalendarError> {
        let labels = self.widget.read_selected_day_labels().await?;
        let marked: BTreeSet<u8> = labels
            .iter()
            .filter_map(|label| {
                let day = normalize_label(label);
                if day.is_none() {
                    debug!(label = %label, "ignoring non-day selected label");
                }
                day
            })
            .collect();
        let observed_dates: BTreeSet<String> = marked.iter().map(u8::to_string).collect();
        debug!(?observed_dates, %expected, "read selected day labels");

        let missing: Vec<String> = [expected.start(), expected.end()]
            .iter()
            .filter(|date| !marked.contains(&date.day().get()))
            .map(CalendarDate::day_label)
            .collect();
        if !missing.is_empty() {
            let detail = format!(
                "Expected days {} and {} selected, missing {}",
                expected.start().day_label(),
                expected.end().day_label(),
                missing.join(", ")
            );
            warn!(%expected, ?observed_dates, "selected endpoints missing");
            return Ok(VerificationResult::mismatch(observed_dates, detail));
        }

        let gaps: Vec<CalendarDate> = match self.contiguity {
            ContiguityCheck::Off => Vec::new(),
            ContiguityCheck::Lenient | ContiguityCheck::Strict => expected
                .days()
                .filter(|date| !marked.contains(&date.day().get()))
                .collect(),
        };

        let mut result = VerificationResult {
            matched: true,
            observed_dates,
            mismatch_detail: None,
            gaps,
        };

        if !result.gaps.is_empty() {
            let listed: Vec<String> = result.gaps.iter().map(ToString::to_string).collect();
            let detail =
                format!("Range {expected} is not contiguous, unmarked: {}", listed.join(", "));
            warn!(%expected, gaps = ?listed, mode = ?self.contiguity, "selection has gaps");
            if self.contiguity == ContiguityCheck::Strict {
                result.matched = false;
            }
            result.mismatch_detail = Some(detail);
        }

        info!(%expected, matched = result.matched, "verified widget selection");
        Ok(result)
    }
}

/// Checks the dates the host application recorded, e.g. in a reservation URL.
#[derive(Debug)]
pub struct DerivedStateVerifier<'a, R: ?Sized> {
    reader: &'a R,
}

impl<'a, R: DerivedStateReader + ?Sized> DerivedStateVerifier<'a, R> {
    pub const fn new(reader: &'a R) -> Self {
        Self { reader }
    }
}

fn parse_param(name: &str, value: Option<&str>) -> Result<CalendarDate, String> {
    let value = value.ok_or_else(|| format!("No {name} date recorded"))?;
    parse_date(value).map_err(|e| format!("Unreadable {name} date {value:?}: {e}"))
}

#[async_trait]
impl<R: DerivedStateReader + ?Sized> SelectionVerifier for DerivedStateVerifier<'_, R> {
    async fn verify(&self, expected: &DateRange) -> Result<VerificationResult, CalendarError> {
        let StructuredDateParams {
            check_in,
            check_out,
        } = self.reader.read_structured_date_params().await?;
        debug!(?check_in, ?check_out, "read derived date params");

        let check_in = parse_param("check-in", check_in.as_deref());
        let check_out = parse_param("check-out", check_out.as_deref());
        let (check_in, check_out) = match (check_in, check_out) {
            (Ok(check_in), Ok(check_out)) => (check_in, check_out),
            (Err(detail), _) | (_, Err(detail)) => {
                warn!(%expected, %detail, "derived dates unusable");
                return Ok(VerificationResult::mismatch(BTreeSet::new(), detail));
            }
        };

        let observed_dates: BTreeSet<String> = match DateRange::new(check_in, check_out) {
            Ok(derived) => derived.days().map(|date| date.day_label()).collect(),
            Err(_) => [check_in.day_label(), check_out.day_label()].into(),
        };

        if (check_in, check_out) != expected.dates() {
            let detail =
                format!("Expected {expected}, application recorded {check_in}/{check_out}");
            warn!(%expected, %check_in, %check_out, "derived dates differ");
            return Ok(VerificationResult::mismatch(observed_dates, detail));
        }

        info!(%expected, "verified derived dates");
        Ok(VerificationResult {
            matched: true,
            observed_dates,
            ..VerificationResult::default()
        })
    }
}

/// Verifies `expected` against the cells `widget` marks selected.
///
/// # Errors
/// Only when the widget fails to report its selection.
pub async fn verify_selection<W>(
    widget: &W,
    expected: &DateRange,
    contiguity: ContiguityCheck,
) -> Result<VerificationResult, CalendarError>
where
    W: CalendarWidget + ?Sized,
{
    WidgetStateVerifier::new(widget, contiguity).verify(expected).await
}

/// Chooses an evidence source for a scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verification {
    contiguity: ContiguityCheck,
}

impl Verification {
    pub const fn new(contiguity: ContiguityCheck) -> Self {
        Self { contiguity }
    }

    pub const fn from_config(config: &PickerConfig) -> Self {
        Self::new(config.contiguity)
    }

    /// The application's recorded dates when a reader is available, since
    /// they don't depend on how the widget renders; otherwise the widget.
    pub fn pick<'a, W>(
        &self,
        widget: &'a W,
        derived: Option<&'a dyn DerivedStateReader>,
    ) -> Box<dyn SelectionVerifier + 'a>
    where
        W: CalendarWidget + ?Sized + 'a,
    {
        match derived {
            Some(reader) => Box::new(DerivedStateVerifier::new(reader)),
            None => Box::new(WidgetStateVerifier::new(widget, self.contiguity)),
        }
    }
}
