//! Capabilities the automation layer exposes for a calendar widget.
//!
//! Everything stays stringly typed at this boundary because that is what a
//! rendered page offers; callers convert to `YearMonth`/`CalendarDate`
//! immediately after reading.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{CHECK_IN_PARAM, CHECK_OUT_PARAM, CalendarError};

/// A date-picker on a live page.
///
/// Every read goes back to the widget; implementations must not cache, since
/// the widget re-renders asynchronously between calls.
#[async_trait]
pub trait CalendarWidget: Send + Sync {
    /// Header text naming the page currently shown, e.g. `"July 2025"`.
    async fn read_displayed_month_year(&self) -> Result<String, CalendarError>;

    /// Labels of every cell currently marked selected or in range.
    async fn read_selected_day_labels(&self) -> Result<BTreeSet<String>, CalendarError>;

    /// Pages forward one month.
    async fn click_next(&mut self) -> Result<(), CalendarError>;

    /// Pages back one month.
    async fn click_previous(&mut self) -> Result<(), CalendarError>;

    /// Clicks the first cell labelled `day`.
    ///
    /// With `exclude_outside_month`, faded cells belonging to the previous or
    /// next month are skipped. Returns `false` when no cell matched.
    async fn click_day_cell(
        &mut self,
        day: u8,
        exclude_outside_month: bool,
    ) -> Result<bool, CalendarError>;
}

/// A page that encodes the chosen dates somewhere structured, such as the
/// query string of a reservation URL.
#[async_trait]
pub trait DerivedStateReader: Send + Sync {
    async fn read_structured_date_params(&self) -> Result<StructuredDateParams, CalendarError>;
}

/// Raw check-in/check-out values as the host application encoded them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDateParams {
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

impl StructuredDateParams {
    pub fn new(check_in: impl Into<String>, check_out: impl Into<String>) -> Self {
        Self {
            check_in: Some(check_in.into()),
            check_out: Some(check_out.into()),
        }
    }

    /// Pulls `checkin`/`checkout` out of a URL's query string.
    ///
    /// Missing or empty parameters come back as `None`.
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                CHECK_IN_PARAM => params.check_in = Some(value.into_owned()),
                CHECK_OUT_PARAM => params.check_out = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    /// Parses `url` first; see [`Self::from_url`].
    ///
    /// # Errors
    /// Returns `CalendarError::Driver` if `url` is not a valid absolute URL.
    pub fn from_url_str(url: &str) -> Result<Self, CalendarError> {
        let url = Url::parse(url).map_err(CalendarError::driver)?;
        Ok(Self::from_url(&url))
    }
}

#[async_trait]
impl DerivedStateReader for StructuredDateParams {
    async fn read_structured_date_params(&self) -> Result<StructuredDateParams, CalendarError> {
        Ok(self.clone())
    }
}
