use tracing::{info, warn};

use crate::{CalendarError, CalendarWidget, MAX_DAY_LABEL, MIN_DAY};

/// Clicks the in-month cell for `day` on whatever page `widget` shows.
///
/// Cells from the neighbouring months are never candidates, so a trailing
/// "15" of next month can't be picked in place of this month's 15th.
///
/// # Errors
/// `DayCellNotFound` when the page has no in-month cell for `day`, e.g. the
/// 31st on a 30-day month.
pub async fn select_day<W>(widget: &mut W, day: u8) -> Result<(), CalendarError>
where
    W: CalendarWidget + ?Sized,
{
    if (MIN_DAY..=MAX_DAY_LABEL).contains(&day) && widget.click_day_cell(day, true).await? {
        info!(day, "selected day cell");
        return Ok(());
    }

    let displayed = widget.read_displayed_month_year().await.ok();
    warn!(day, ?displayed, "no in-month cell for day");
    Err(CalendarError::DayCellNotFound { day, displayed })
}
