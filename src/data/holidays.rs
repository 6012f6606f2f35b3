use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::errors::AppError;

/// Source of market holidays. Swap implementations to cover other years or
/// other exchanges without touching the calendar code.
pub trait HolidayCalendar: Send + Sync {
    /// Name of the holiday on `date`, if any.
    fn holiday_name(&self, date: NaiveDate) -> Option<&str>;

    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_name(date).is_some()
    }
}

/// US market closures for 2025, including the 2025-01-09 national day of mourning.
const US_MARKET_2025: &[(i32, u32, u32, &str)] = &[
    (2025, 1, 1, "New Year's Day"),
    (2025, 1, 9, "Jimmy Carter's Mourning"),
    (2025, 1, 20, "Martin Luther King Jr. Day"),
    (2025, 2, 17, "Presidents' Day"),
    (2025, 4, 18, "Good Friday"),
    (2025, 5, 26, "Memorial Day"),
    (2025, 6, 19, "Juneteenth"),
    (2025, 7, 4, "Independence Day"),
    (2025, 9, 1, "Labor Day"),
    (2025, 11, 27, "Thanksgiving Day"),
    (2025, 12, 25, "Christmas Day"),
];

/// Date → holiday name lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayTable {
    entries: BTreeMap<NaiveDate, String>,
}

impl HolidayTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in 2025 US market table.
    pub fn us_market_2025() -> Self {
        let entries = US_MARKET_2025
            .iter()
            .filter_map(|&(y, m, d, name)| {
                NaiveDate::from_ymd_opt(y, m, d).map(|date| (date, name.to_string()))
            })
            .collect();
        Self { entries }
    }

    /// Parse a JSON object of `"YYYY-MM-DD": "Holiday name"` pairs.
    pub fn from_json_str(text: &str) -> Result<Self, AppError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(text)
            .map_err(|e| AppError::InvalidHolidays(e.to_string()))?;
        let mut table = Self::new();
        for (key, name) in raw {
            let date = NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d")
                .map_err(|_| AppError::InvalidHolidays(format!("bad date key {:?}", key)))?;
            table.insert(date, name);
        }
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::InvalidHolidays(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn insert(&mut self, date: NaiveDate, name: impl Into<String>) {
        self.entries.insert(date, name.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Holidays falling in `year`, in date order.
    pub fn for_year(&self, year: i32) -> impl Iterator<Item = (NaiveDate, &str)> + '_ {
        self.entries
            .iter()
            .filter(move |(date, _)| date.year() == year)
            .map(|(date, name)| (*date, name.as_str()))
    }
}

impl HolidayCalendar for HolidayTable {
    fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.entries.get(&date).map(String::as_str)
    }
}
