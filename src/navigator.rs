//! Paging a calendar widget to a target month and selecting dates on it.

use std::time::Duration;

use serde::Serialize;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::{
    CalendarDate, CalendarError, CalendarWidget, DEFAULT_MAX_ITERATIONS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_SETTLE_TIMEOUT_MS, DateRange, PickerConfig, YearMonth, prelude::*, select_day,
};

/// Which navigation control moves the widget toward its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum NavigationDirection {
    #[display(fmt = "next")]
    Forward,
    #[display(fmt = "previous")]
    Backward,
}

impl NavigationDirection {
    /// The step that reduces the distance from `current` to `target`, or
    /// `None` once they are the same page.
    pub fn between(current: YearMonth, target: YearMonth) -> Option<Self> {
        match current.cmp(&target) {
            std::cmp::Ordering::Less => Some(Self::Forward),
            std::cmp::Ordering::Greater => Some(Self::Backward),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// How to wait for the widget to re-render after a navigation click.
///
/// The header is re-read every `poll_interval` until it differs from the
/// label seen before the click or `timeout` runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlePolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_SETTLE_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl SettlePolicy {
    /// Checks the header once and never sleeps.
    pub const fn immediate() -> Self {
        Self {
            timeout: Duration::ZERO,
            poll_interval: Duration::from_millis(1),
        }
    }

    /// Returns `true` once the header moved away from `previous`, `false` on timeout.
    async fn wait_for_change<W>(&self, widget: &W, previous: &str) -> Result<bool, CalendarError>
    where
        W: CalendarWidget + ?Sized,
    {
        let deadline = Instant::now() + self.timeout;
        let interval = self.poll_interval.max(Duration::from_millis(1));
        loop {
            let label = widget.read_displayed_month_year().await?;
            if label.trim() != previous.trim() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(interval).await;
        }
    }
}

/// What a successful navigation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationReport {
    pub target: YearMonth,
    /// Navigation clicks issued; zero when the widget was already aligned
    pub clicks: u32,
    /// Direction of the clicks, if any were needed
    pub direction: Option<NavigationDirection>,
}

/// Drives a widget's own next/previous controls to reach a month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarNavigator {
    max_iterations: u32,
    settle: SettlePolicy,
    between_selections: Duration,
}

impl Default for CalendarNavigator {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            settle: SettlePolicy::default(),
            between_selections: Duration::ZERO,
        }
    }
}

impl CalendarNavigator {
    pub fn new(max_iterations: u32, settle: SettlePolicy) -> Self {
        Self {
            max_iterations,
            settle,
            ..Self::default()
        }
    }

    pub fn from_config(config: &PickerConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            settle: SettlePolicy {
                timeout: config.settle_timeout(),
                poll_interval: config.poll_interval(),
            },
            between_selections: config.between_selections(),
        }
    }

    #[must_use]
    pub const fn with_between_selections(mut self, pause: Duration) -> Self {
        self.between_selections = pause;
        self
    }

    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub const fn settle(&self) -> SettlePolicy {
        self.settle
    }

    /// Pages `widget` until its header shows `target`.
    ///
    /// Already aligned widgets get no clicks at all.
    ///
    /// # Errors
    /// - `WidgetStateUnparseable` as soon as the header is not a month/year label
    /// - `NavigationExhausted` after `max_iterations` clicks without reaching `target`
    /// - `Driver` when the widget itself fails
    pub async fn navigate_to_month<W>(
        &self,
        widget: &mut W,
        target: YearMonth,
    ) -> Result<NavigationReport, CalendarError>
    where
        W: CalendarWidget + ?Sized,
    {
        let mut clicks = 0;
        let mut direction = None;

        loop {
            let label = widget.read_displayed_month_year().await?;
            let current = label
                .parse::<YearMonth>()
                .map_err(|source| CalendarError::WidgetStateUnparseable {
                    label: label.clone(),
                    source,
                })?;
            debug!(%current, %target, clicks, "calendar header");

            let Some(step) = NavigationDirection::between(current, target) else {
                info!(%target, clicks, "reached target month");
                return Ok(NavigationReport {
                    target,
                    clicks,
                    direction,
                });
            };

            if clicks >= self.max_iterations {
                warn!(%target, last = %label, clicks, "navigation attempts exhausted");
                return Err(CalendarError::NavigationExhausted {
                    target,
                    last_label: label,
                    iterations: clicks,
                });
            }

            match step {
                NavigationDirection::Forward => widget.click_next().await?,
                NavigationDirection::Backward => widget.click_previous().await?,
            }
            clicks += 1;
            direction = Some(step);
            debug!(from = %current, %step, "clicked navigation control");

            if !self.settle.wait_for_change(&*widget, &label).await? {
                warn!(
                    header = %label,
                    timeout = ?self.settle.timeout,
                    "calendar header did not change after navigation click"
                );
            }
        }
    }

    /// Navigates to the page holding `date`, then clicks its in-month cell.
    ///
    /// # Errors
    /// Any navigation error, or `DayCellNotFound` from the selection.
    pub async fn select_date<W>(
        &self,
        widget: &mut W,
        date: &CalendarDate,
    ) -> Result<NavigationReport, CalendarError>
    where
        W: CalendarWidget + ?Sized,
    {
        info!(%date, "selecting date");
        let report = self.navigate_to_month(widget, date.year_month()).await?;
        select_day(widget, date.day().get()).await?;
        Ok(report)
    }

    /// Selects check-in then check-out on one widget.
    ///
    /// # Errors
    /// Stops at the first failing endpoint; see [`Self::select_date`].
    pub async fn select_range<W>(
        &self,
        widget: &mut W,
        range: &DateRange,
    ) -> Result<(NavigationReport, NavigationReport), CalendarError>
    where
        W: CalendarWidget + ?Sized,
    {
        info!(%range, "selecting date range");
        let check_in = self.select_date(widget, &range.start()).await?;
        self.pause_between_selections().await;
        let check_out = self.select_date(widget, &range.end()).await?;
        Ok((check_in, check_out))
    }

    /// Selects check-in and check-out on separate widgets, for pages that
    /// render one calendar per endpoint.
    ///
    /// # Errors
    /// Stops at the first failing endpoint; see [`Self::select_date`].
    pub async fn select_range_split<A, B>(
        &self,
        check_in_widget: &mut A,
        check_out_widget: &mut B,
        range: &DateRange,
    ) -> Result<(NavigationReport, NavigationReport), CalendarError>
    where
        A: CalendarWidget + ?Sized,
        B: CalendarWidget + ?Sized,
    {
        info!(%range, "selecting date range on two calendars");
        let check_in = self.select_date(check_in_widget, &range.start()).await?;
        self.pause_between_selections().await;
        let check_out = self.select_date(check_out_widget, &range.end()).await?;
        Ok((check_in, check_out))
    }

    async fn pause_between_selections(&self) {
        if !self.between_selections.is_zero() {
            sleep(self.between_selections).await;
        }
    }
}

/// Pages `widget` to `target_year`/`target_month` with the default settle policy.
///
/// # Errors
/// `InvalidDateFormat` for an impossible target (checked before any click),
/// otherwise as [`CalendarNavigator::navigate_to_month`].
pub async fn navigate_to_month<W>(
    widget: &mut W,
    target_year: u16,
    target_month: u8,
    max_iterations: u32,
) -> Result<NavigationReport, CalendarError>
where
    W: CalendarWidget + ?Sized,
{
    let target = YearMonth::from_numbers(target_year, target_month)?;
    CalendarNavigator::new(max_iterations, SettlePolicy::default())
        .navigate_to_month(widget, target)
        .await
}
