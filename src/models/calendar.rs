use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::summary::Summary;

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Day slots for one month, Sunday-first. Leading `None`s pad the first week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarGrid {
    pub year: i32,
    pub month: u32,
    pub slots: Vec<Option<u32>>,
}

impl CalendarGrid {
    pub fn leading_blanks(&self) -> usize {
        self.slots.iter().take_while(|s| s.is_none()).count()
    }

    pub fn days_in_month(&self) -> u32 {
        self.slots.iter().flatten().count() as u32
    }
}

/// Visual state of a day cell, in precedence order: holiday, weekend, then data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Holiday,
    Weekend,
    Profit,
    Loss,
    /// Trades recorded, net P/L exactly zero.
    Flat,
    Empty,
}

impl DayStatus {
    /// Weekend and holiday cells cannot be opened.
    pub fn is_disabled(&self) -> bool {
        matches!(self, DayStatus::Holiday | DayStatus::Weekend)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Holiday => "holiday",
            DayStatus::Weekend => "weekend",
            DayStatus::Profit => "profit",
            DayStatus::Loss => "loss",
            DayStatus::Flat => "flat",
            DayStatus::Empty => "empty",
        }
    }
}

impl std::fmt::Display for DayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One populated grid slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    pub status: DayStatus,
    pub summary: Summary,
    pub holiday_name: Option<String>,
    /// Hover text shown by front ends.
    pub title: String,
}

impl DayCell {
    pub fn is_disabled(&self) -> bool {
        self.status.is_disabled()
    }
}

/// A weekend or holiday that still has trades recorded against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuppressedDay {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub summary: Summary,
}
