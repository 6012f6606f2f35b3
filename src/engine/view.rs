use chrono::{Month, NaiveDate};

use crate::data::holidays::HolidayCalendar;
use crate::engine::aggregate::{aggregate_month, aggregate_year, trades_on, DailyIndex};
use crate::engine::calendar::{build_cells, generate_days_in_month, suppressed_days};
use crate::errors::AppError;
use crate::models::calendar::WEEKDAY_HEADERS;
use crate::models::trade::TradeRecord;
use crate::models::view::{CalendarView, DayDetail, TradeRow, ViewState};

/// Loaded trades together with their per-day index.
#[derive(Debug, Clone, Default)]
pub struct TradeBook {
    pub records: Vec<TradeRecord>,
    pub index: DailyIndex,
}

impl TradeBook {
    pub fn new(records: Vec<TradeRecord>) -> Self {
        let index = DailyIndex::build(&records);
        Self { records, index }
    }
}

/// English month name for 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
}

/// Assemble everything needed to draw `state`.
pub fn build_view(
    book: &TradeBook,
    holidays: &dyn HolidayCalendar,
    state: &ViewState,
    diagnostic: Option<&str>,
) -> Result<CalendarView, AppError> {
    let grid = generate_days_in_month(state.year, state.month)?;
    let name = month_name(state.month)
        .ok_or_else(|| AppError::InvalidDate(format!("month {}", state.month)))?;

    let detail = match state.selected_day() {
        Some(day) => {
            let date = NaiveDate::from_ymd_opt(state.year, state.month, day).ok_or_else(|| {
                AppError::InvalidDate(format!("{}-{:02}-{:02}", state.year, state.month, day))
            })?;
            Some(build_day_detail(book, date))
        }
        None => None,
    };

    Ok(CalendarView {
        title: format!("Trading Calendar - {} {}", name, state.year),
        year: state.year,
        month: state.month,
        month_name: name.to_string(),
        weekday_headers: WEEKDAY_HEADERS.iter().map(|d| d.to_string()).collect(),
        cells: build_cells(&grid, &book.index, holidays),
        yearly: aggregate_year(&book.records),
        monthly: aggregate_month(&book.records, state.month, state.year),
        detail,
        suppressed: suppressed_days(&book.index, state.year, state.month, holidays),
        diagnostic: diagnostic.map(str::to_string),
    })
}

/// Day summary plus the per-trade breakdown.
pub fn build_day_detail(book: &TradeBook, date: NaiveDate) -> DayDetail {
    let trades = trades_on(&book.records, date)
        .into_iter()
        .map(|t| TradeRow {
            open_time: t.open_time.clone(),
            pnl: t.pnl,
            result: t.outcome.label().to_string(),
            entry_price: t.entry_price,
            exit_price: t.exit_price,
        })
        .collect();

    DayDetail {
        date,
        summary: book.index.get(date),
        trades,
    }
}
