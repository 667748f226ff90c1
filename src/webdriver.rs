//! react-datepicker driven over WebDriver.
//!
//! Every call queries the page again; element handles are never kept between
//! calls because the picker re-renders its whole month grid on navigation.

use std::collections::BTreeSet;

use async_trait::async_trait;
use fantoccini::{Client, Locator, elements::Element};
use tracing::debug;

use crate::{CalendarError, CalendarWidget, DerivedStateReader, StructuredDateParams};

const PICKER: &str = ".react-datepicker";
const HEADER: &str = ".react-datepicker__current-month";
const NEXT: &str = ".react-datepicker__navigation--next";
const PREVIOUS: &str = ".react-datepicker__navigation--previous";
const OUTSIDE_MONTH: &str = ".react-datepicker__day--outside-month";

/// Tried in order; the first that matches anything wins.
const SELECTED_DAYS: [&str; 4] = [
    ".react-datepicker__day--selected",
    ".react-datepicker__day[aria-selected=\"true\"]",
    ".react-datepicker__day--in-selecting-range",
    ".react-datepicker__day--in-range",
];

/// The `index`-th react-datepicker on the current page.
#[derive(Debug, Clone)]
pub struct ReactDatePicker {
    client: Client,
    index: usize,
}

impl ReactDatePicker {
    pub const fn new(client: Client) -> Self {
        Self::nth(client, 0)
    }

    /// For pages rendering one picker per endpoint.
    pub const fn nth(client: Client, index: usize) -> Self {
        Self { client, index }
    }

    async fn root(&self) -> Result<Element, CalendarError> {
        let mut pickers = self
            .client
            .find_all(Locator::Css(PICKER))
            .await
            .map_err(CalendarError::driver)?;
        if self.index >= pickers.len() {
            return Err(CalendarError::driver(format!(
                "date picker #{} not on page ({} found)",
                self.index,
                pickers.len()
            )));
        }
        Ok(pickers.swap_remove(self.index))
    }

    async fn click(&self, selector: &str) -> Result<(), CalendarError> {
        let root = self.root().await?;
        let control = root
            .find(Locator::Css(selector))
            .await
            .map_err(CalendarError::driver)?;
        control.click().await.map_err(CalendarError::driver)
    }
}

fn day_cell_selector(day: u8, exclude_outside_month: bool) -> String {
    if exclude_outside_month {
        format!(".react-datepicker__day--{day:03}:not({OUTSIDE_MONTH})")
    } else {
        format!(".react-datepicker__day--{day:03}")
    }
}

#[async_trait]
impl CalendarWidget for ReactDatePicker {
    async fn read_displayed_month_year(&self) -> Result<String, CalendarError> {
        let root = self.root().await?;
        let header = root
            .find(Locator::Css(HEADER))
            .await
            .map_err(CalendarError::driver)?;
        header.text().await.map_err(CalendarError::driver)
    }

    async fn read_selected_day_labels(&self) -> Result<BTreeSet<String>, CalendarError> {
        let root = self.root().await?;
        for selector in SELECTED_DAYS {
            let cells = root
                .find_all(Locator::Css(selector))
                .await
                .map_err(CalendarError::driver)?;
            if cells.is_empty() {
                continue;
            }
            debug!(selector, count = cells.len(), "found selected cells");
            let mut labels = BTreeSet::new();
            for cell in cells {
                labels.insert(cell.text().await.map_err(CalendarError::driver)?);
            }
            return Ok(labels);
        }
        Ok(BTreeSet::new())
    }

    async fn click_next(&mut self) -> Result<(), CalendarError> {
        self.click(NEXT).await
    }

    async fn click_previous(&mut self) -> Result<(), CalendarError> {
        self.click(PREVIOUS).await
    }

    async fn click_day_cell(
        &mut self,
        day: u8,
        exclude_outside_month: bool,
    ) -> Result<bool, CalendarError> {
        let root = self.root().await?;
        let selector = day_cell_selector(day, exclude_outside_month);
        let cells = root
            .find_all(Locator::Css(&selector))
            .await
            .map_err(CalendarError::driver)?;
        let Some(cell) = cells.into_iter().next() else {
            debug!(%selector, "no matching day cell");
            return Ok(false);
        };
        cell.click().await.map_err(CalendarError::driver)?;
        Ok(true)
    }
}

/// Reads `checkin`/`checkout` from the browser's current URL.
#[derive(Debug, Clone)]
pub struct UrlDateParams {
    client: Client,
}

impl UrlDateParams {
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DerivedStateReader for UrlDateParams {
    async fn read_structured_date_params(&self) -> Result<StructuredDateParams, CalendarError> {
        let url = self
            .client
            .current_url()
            .await
            .map_err(CalendarError::driver)?;
        debug!(%url, "reading dates from url");
        Ok(StructuredDateParams::from_url(&url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_cell_selector() {
        assert_eq!(
            day_cell_selector(5, true),
            ".react-datepicker__day--005:not(.react-datepicker__day--outside-month)"
        );
        assert_eq!(day_cell_selector(15, false), ".react-datepicker__day--015");
    }
}
