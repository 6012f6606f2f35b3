use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calendar::{DayCell, SuppressedDay};
use super::summary::Summary;

/// Which screen is showing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ViewMode {
    MonthGrid,
    DayDetail { day: u32 },
}

/// Complete UI selection state. Advanced only by `engine::state::update`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewState {
    pub year: i32,
    pub month: u32,
    pub mode: ViewMode,
}

impl ViewState {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            mode: ViewMode::MonthGrid,
        }
    }

    pub fn selected_day(&self) -> Option<u32> {
        match self.mode {
            ViewMode::DayDetail { day } => Some(day),
            ViewMode::MonthGrid => None,
        }
    }
}

/// User interactions understood by the reducer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Action {
    SelectMonth(u32),
    NextMonth,
    PreviousMonth,
    ClickDay(u32),
    CloseDay,
}

/// One trade in the day breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeRow {
    pub open_time: String,
    pub pnl: f64,
    pub result: String,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
}

/// Drill-down for a single day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayDetail {
    pub date: NaiveDate,
    pub summary: Summary,
    pub trades: Vec<TradeRow>,
}

/// Everything a front end needs to draw the current screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarView {
    pub title: String,
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub weekday_headers: Vec<String>,
    pub cells: Vec<Option<DayCell>>,
    pub yearly: Summary,
    pub monthly: Summary,
    pub detail: Option<DayDetail>,
    pub suppressed: Vec<SuppressedDay>,
    /// Set when the trade log could not be loaded.
    pub diagnostic: Option<String>,
}
