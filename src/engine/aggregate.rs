use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::summary::Summary;
use crate::models::trade::TradeRecord;

/// Statistics for every trade on exactly `year-month-day`.
pub fn aggregate_day(records: &[TradeRecord], day: u32, month: u32, year: i32) -> Summary {
    Summary::from_records(
        records
            .iter()
            .filter(|t| t.date.day() == day && t.date.month() == month && t.date.year() == year),
    )
}

/// Statistics for every trade in `month` of `year`.
pub fn aggregate_month(records: &[TradeRecord], month: u32, year: i32) -> Summary {
    Summary::from_records(
        records
            .iter()
            .filter(|t| t.date.month() == month && t.date.year() == year),
    )
}

/// Statistics over the whole loaded log. No year filter is applied.
pub fn aggregate_year(records: &[TradeRecord]) -> Summary {
    Summary::from_records(records)
}

/// Month-by-month statistics for `year`, January first. Always 12 entries.
pub fn monthly_breakdown(records: &[TradeRecord], year: i32) -> Vec<(u32, Summary)> {
    let mut months: Vec<(u32, Summary)> = (1..=12).map(|m| (m, Summary::default())).collect();
    for record in records.iter().filter(|t| t.date.year() == year) {
        months[record.date.month0() as usize].1.push(record);
    }
    months
}

/// Trades of a single day, in file order.
pub fn trades_on(records: &[TradeRecord], date: NaiveDate) -> Vec<&TradeRecord> {
    records.iter().filter(|t| t.date == date).collect()
}

/// Per-day summaries built once per load, so drawing a month is a handful of
/// map lookups instead of one scan of the log per cell.
#[derive(Debug, Clone, Default)]
pub struct DailyIndex {
    days: BTreeMap<NaiveDate, Summary>,
}

impl DailyIndex {
    pub fn build(records: &[TradeRecord]) -> Self {
        let mut days: BTreeMap<NaiveDate, Summary> = BTreeMap::new();
        for record in records {
            days.entry(record.date).or_default().push(record);
        }
        Self { days }
    }

    /// Summary for `date`; zero-valued when nothing traded.
    pub fn get(&self, date: NaiveDate) -> Summary {
        self.days.get(&date).copied().unwrap_or_default()
    }

    /// Trading days within `year`/`month`, in date order.
    pub fn month(&self, year: i32, month: u32) -> impl Iterator<Item = (NaiveDate, &Summary)> + '_ {
        self.days
            .iter()
            .filter(move |(d, _)| d.year() == year && d.month() == month)
            .map(|(d, s)| (*d, s))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &Summary)> + '_ {
        self.days.iter().map(|(d, s)| (*d, s))
    }

    /// Number of distinct trading days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
