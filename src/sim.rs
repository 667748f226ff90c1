//! An in-memory date-picker for exercising navigation and verification
//! without a browser.
//!
//! It renders pages the way react-datepicker does: whole weeks starting on
//! Sunday, with faded cells from the neighbouring months filling the first
//! and last week, and a two-click range selection.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{Datelike, Days};
use parking_lot::Mutex;

use crate::{CalendarDate, CalendarError, CalendarWidget, YearMonth};

const DAYS_PER_WEEK: u64 = 7;

/// One rendered day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: CalendarDate,
    /// Faded cell belonging to the previous or next month
    pub outside_month: bool,
}

#[derive(Debug, Default)]
struct HeaderRender {
    stale_label: Option<String>,
    stale_reads_left: u32,
}

#[derive(Debug)]
pub struct SimulatedCalendar {
    displayed: YearMonth,
    min_trailing_days: u64,
    render_lag: u32,
    marks_whole_range: bool,
    padded_labels: bool,
    label_override: Option<String>,
    start: Option<CalendarDate>,
    end: Option<CalendarDate>,
    next_clicks: u32,
    previous_clicks: u32,
    day_clicks: u32,
    header: Mutex<HeaderRender>,
}

impl SimulatedCalendar {
    pub fn new(displayed: YearMonth) -> Self {
        Self {
            displayed,
            min_trailing_days: 0,
            render_lag: 0,
            marks_whole_range: true,
            padded_labels: false,
            label_override: None,
            start: None,
            end: None,
            next_clicks: 0,
            previous_clicks: 0,
            day_clicks: 0,
            header: Mutex::new(HeaderRender::default()),
        }
    }

    /// Keeps showing the previous header for `reads` reads after each navigation click.
    #[must_use]
    pub const fn with_render_lag(mut self, reads: u32) -> Self {
        self.render_lag = reads;
        self
    }

    /// Renders at least `days` cells of the following month after the last in-month day.
    #[must_use]
    pub const fn with_min_trailing_days(mut self, days: u64) -> Self {
        self.min_trailing_days = days;
        self
    }

    /// Marks only the two endpoints of a range as selected, not the days between.
    #[must_use]
    pub const fn with_endpoint_marking_only(mut self) -> Self {
        self.marks_whole_range = false;
        self
    }

    /// Renders day labels zero-padded ("07").
    #[must_use]
    pub const fn with_padded_labels(mut self) -> Self {
        self.padded_labels = true;
        self
    }

    /// Replaces the header text, e.g. to mimic an unexpected locale.
    pub fn set_label_override(&mut self, label: Option<&str>) {
        self.label_override = label.map(str::to_owned);
    }

    pub const fn displayed(&self) -> YearMonth {
        self.displayed
    }

    pub const fn next_clicks(&self) -> u32 {
        self.next_clicks
    }

    pub const fn previous_clicks(&self) -> u32 {
        self.previous_clicks
    }

    pub const fn day_clicks(&self) -> u32 {
        self.day_clicks
    }

    pub const fn selected_start(&self) -> Option<CalendarDate> {
        self.start
    }

    pub const fn selected_end(&self) -> Option<CalendarDate> {
        self.end
    }

    pub fn clear_selection(&mut self) {
        self.start = None;
        self.end = None;
    }

    /// Every cell on the current page, in rendering order.
    pub fn cells(&self) -> Vec<DayCell> {
        let Some(first) = CalendarDate::new(
            self.displayed.year().get(),
            self.displayed.month().get(),
            1,
        )
        .ok()
        .and_then(CalendarDate::to_naive) else {
            return Vec::new();
        };

        let leading = u64::from(first.weekday().num_days_from_sunday());
        let in_month = u64::from(self.displayed.days());
        let week_fill = (DAYS_PER_WEEK - (leading + in_month) % DAYS_PER_WEEK) % DAYS_PER_WEEK;
        let trailing = week_fill.max(self.min_trailing_days);

        let Some(grid_start) = first.checked_sub_days(Days::new(leading)) else {
            return Vec::new();
        };

        (0..leading + in_month + trailing)
            .filter_map(|offset| grid_start.checked_add_days(Days::new(offset)))
            .filter_map(|naive| CalendarDate::from_naive(naive).ok())
            .map(|date| DayCell {
                date,
                outside_month: date.year_month() != self.displayed,
            })
            .collect()
    }

    /// How many rendered cells carry the label for `day`, in or out of month.
    pub fn cells_labelled(&self, day: u8) -> usize {
        self.cells()
            .iter()
            .filter(|cell| cell.date.day().get() == day)
            .count()
    }

    fn label_for(&self, date: CalendarDate) -> String {
        if self.padded_labels {
            format!("{:02}", date.day().get())
        } else {
            date.day_label()
        }
    }

    fn is_marked(&self, date: CalendarDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) if self.marks_whole_range => start <= date && date <= end,
            (Some(start), Some(end)) => date == start || date == end,
            (Some(start), None) => date == start,
            _ => false,
        }
    }

    fn select(&mut self, date: CalendarDate) {
        match (self.start, self.end) {
            (Some(start), None) if date > start => self.end = Some(date),
            _ => {
                self.start = Some(date);
                self.end = None;
            }
        }
    }

    fn page_to(&mut self, next: Option<YearMonth>) {
        let Some(next) = next else {
            return;
        };
        let previous_label = self.displayed.to_string();
        self.displayed = next;
        if self.render_lag > 0 {
            let header = self.header.get_mut();
            header.stale_label = Some(previous_label);
            header.stale_reads_left = self.render_lag;
        }
    }
}

#[async_trait]
impl CalendarWidget for SimulatedCalendar {
    async fn read_displayed_month_year(&self) -> Result<String, CalendarError> {
        if let Some(label) = &self.label_override {
            return Ok(label.clone());
        }
        let mut header = self.header.lock();
        if header.stale_reads_left > 0 {
            header.stale_reads_left -= 1;
            if let Some(stale) = &header.stale_label {
                return Ok(stale.clone());
            }
        }
        Ok(self.displayed.to_string())
    }

    async fn read_selected_day_labels(&self) -> Result<BTreeSet<String>, CalendarError> {
        Ok(self
            .cells()
            .into_iter()
            .filter(|cell| self.is_marked(cell.date))
            .map(|cell| self.label_for(cell.date))
            .collect())
    }

    async fn click_next(&mut self) -> Result<(), CalendarError> {
        self.next_clicks += 1;
        self.page_to(self.displayed.succ());
        Ok(())
    }

    async fn click_previous(&mut self) -> Result<(), CalendarError> {
        self.previous_clicks += 1;
        self.page_to(self.displayed.pred());
        Ok(())
    }

    async fn click_day_cell(
        &mut self,
        day: u8,
        exclude_outside_month: bool,
    ) -> Result<bool, CalendarError> {
        self.day_clicks += 1;
        let target = self.cells().into_iter().find(|cell| {
            cell.date.day().get() == day && !(exclude_outside_month && cell.outside_month)
        });

        match target {
            Some(cell) => {
                self.select(cell.date);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, page};

    #[test]
    fn test_grid_has_whole_weeks() {
        for (year, month) in [(2025, 2), (2025, 6), (2025, 7), (2024, 2), (2026, 1)] {
            let widget = SimulatedCalendar::new(page(year, month));
            let cells = widget.cells();
            assert_eq!(cells.len() % 7, 0, "{year}-{month}");
            let in_month = cells.iter().filter(|c| !c.outside_month).count();
            assert_eq!(in_month, usize::from(page(year, month).days()));
        }
    }

    #[test]
    fn test_july_2025_layout() {
        let cells = SimulatedCalendar::new(page(2025, 7)).cells();
        assert_eq!(cells[0].date, date(2025, 6, 29));
        assert!(cells[0].outside_month);
        assert_eq!(cells[2].date, date(2025, 7, 1));
        assert!(!cells[2].outside_month);
        assert_eq!(cells.last().map(|c| c.date), Some(date(2025, 8, 2)));
    }

    #[test]
    fn test_trailing_days_extend_grid() {
        let widget = SimulatedCalendar::new(page(2025, 6)).with_min_trailing_days(20);
        let trailing = widget.cells().iter().filter(|c| c.outside_month).count();
        assert_eq!(trailing, 20);
        assert_eq!(widget.cells_labelled(15), 2);
    }

    #[tokio::test]
    async fn test_range_selection_marks_days_between() {
        let mut widget = SimulatedCalendar::new(page(2025, 7));
        assert!(widget.click_day_cell(15, true).await.unwrap());
        assert!(widget.click_day_cell(18, true).await.unwrap());

        let labels = widget.read_selected_day_labels().await.unwrap();
        let expected: BTreeSet<String> = ["15", "16", "17", "18"].map(String::from).into();
        assert_eq!(labels, expected);
    }

    #[tokio::test]
    async fn test_clear_selection_resets_range() {
        let mut widget = SimulatedCalendar::new(page(2025, 7));
        widget.click_day_cell(15, true).await.unwrap();
        widget.click_day_cell(18, true).await.unwrap();
        widget.clear_selection();

        assert_eq!(widget.selected_start(), None);
        assert_eq!(widget.selected_end(), None);
        assert!(widget.read_selected_day_labels().await.unwrap().is_empty());

        widget.click_day_cell(20, true).await.unwrap();
        assert_eq!(widget.selected_start(), Some(date(2025, 7, 20)));
    }

    #[tokio::test]
    async fn test_click_before_start_restarts_selection() {
        let mut widget = SimulatedCalendar::new(page(2025, 7));
        widget.click_day_cell(15, true).await.unwrap();
        widget.click_day_cell(10, true).await.unwrap();
        assert_eq!(widget.selected_start(), Some(date(2025, 7, 10)));
        assert_eq!(widget.selected_end(), None);
    }

    #[tokio::test]
    async fn test_outside_cell_selected_when_not_excluded() {
        let mut widget = SimulatedCalendar::new(page(2025, 7));
        assert!(widget.click_day_cell(30, false).await.unwrap());
        assert_eq!(widget.selected_start(), Some(date(2025, 6, 30)));
    }

    #[tokio::test]
    async fn test_render_lag_serves_stale_header() {
        let mut widget = SimulatedCalendar::new(page(2025, 1)).with_render_lag(2);
        widget.click_next().await.unwrap();
        assert_eq!(widget.read_displayed_month_year().await.unwrap(), "January 2025");
        assert_eq!(widget.read_displayed_month_year().await.unwrap(), "January 2025");
        assert_eq!(widget.read_displayed_month_year().await.unwrap(), "February 2025");
    }

    #[tokio::test]
    async fn test_padded_labels_and_endpoint_marking() {
        let mut widget = SimulatedCalendar::new(page(2025, 7))
            .with_padded_labels()
            .with_endpoint_marking_only();
        widget.click_day_cell(5, true).await.unwrap();
        widget.click_day_cell(8, true).await.unwrap();

        let labels = widget.read_selected_day_labels().await.unwrap();
        let expected: BTreeSet<String> = ["05", "08"].map(String::from).into();
        assert_eq!(labels, expected);
    }
}
