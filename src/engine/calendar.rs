use chrono::{Datelike, NaiveDate, Weekday};

use crate::data::holidays::HolidayCalendar;
use crate::engine::aggregate::DailyIndex;
use crate::errors::AppError;
use crate::models::calendar::{CalendarGrid, DayCell, DayStatus, SuppressedDay};
use crate::models::summary::Summary;

/// Number of days in `month` of `year`, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Sunday-first grid for a month: one blank per weekday before the 1st,
/// then the day numbers.
pub fn generate_days_in_month(year: i32, month: u32) -> Result<CalendarGrid, AppError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidDate(format!("{}-{:02}", year, month)))?;
    let days = days_in_month(year, month)
        .ok_or_else(|| AppError::InvalidDate(format!("{}-{:02}", year, month)))?;

    let leading = first.weekday().num_days_from_sunday() as usize;
    let mut slots: Vec<Option<u32>> = vec![None; leading];
    slots.extend((1..=days).map(Some));

    Ok(CalendarGrid { year, month, slots })
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Decide a day's status. Holiday beats weekend, weekend beats trade data.
pub fn classify_day(date: NaiveDate, summary: &Summary, holidays: &dyn HolidayCalendar) -> DayStatus {
    if holidays.is_holiday(date) {
        DayStatus::Holiday
    } else if is_weekend(date) {
        DayStatus::Weekend
    } else if summary.total_pl > 0.0 {
        DayStatus::Profit
    } else if summary.total_pl < 0.0 {
        DayStatus::Loss
    } else if summary.total_trades > 0 {
        DayStatus::Flat
    } else {
        DayStatus::Empty
    }
}

/// Whether a day can be opened in the detail view.
pub fn is_selectable(date: NaiveDate, holidays: &dyn HolidayCalendar) -> bool {
    !holidays.is_holiday(date) && !is_weekend(date)
}

/// Build the cell for one date.
pub fn build_cell(date: NaiveDate, index: &DailyIndex, holidays: &dyn HolidayCalendar) -> DayCell {
    let summary = index.get(date);
    let status = classify_day(date, &summary, holidays);
    let holiday_name = holidays.holiday_name(date).map(str::to_string);

    let title = match status {
        DayStatus::Holiday => holiday_name.clone().unwrap_or_else(|| "Holiday".to_string()),
        DayStatus::Weekend => "Weekend".to_string(),
        DayStatus::Profit | DayStatus::Loss => format!(
            "P/L: ${:.2}\nTrades: {}\nWins/Losses: {}/{}",
            summary.total_pl, summary.total_trades, summary.total_wins, summary.total_losses
        ),
        DayStatus::Flat | DayStatus::Empty => "No data".to_string(),
    };

    DayCell {
        day: date.day(),
        date,
        status,
        summary,
        holiday_name,
        title,
    }
}

/// Populate every slot of `grid` with its cell; blanks stay `None`.
pub fn build_cells(
    grid: &CalendarGrid,
    index: &DailyIndex,
    holidays: &dyn HolidayCalendar,
) -> Vec<Option<DayCell>> {
    grid.slots
        .iter()
        .map(|slot| {
            slot.and_then(|day| NaiveDate::from_ymd_opt(grid.year, grid.month, day))
                .map(|date| build_cell(date, index, holidays))
        })
        .collect()
}

/// Weekend and holiday dates in the month that still have trades. Their cells
/// are disabled, so these trades cannot be reached from the grid.
pub fn suppressed_days(
    index: &DailyIndex,
    year: i32,
    month: u32,
    holidays: &dyn HolidayCalendar,
) -> Vec<SuppressedDay> {
    index
        .month(year, month)
        .filter_map(|(date, summary)| {
            let status = classify_day(date, summary, holidays);
            status.is_disabled().then(|| SuppressedDay {
                date,
                status,
                summary: *summary,
            })
        })
        .collect()
}
