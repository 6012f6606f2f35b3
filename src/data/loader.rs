use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::trade::{TradeOutcome, TradeRecord};

/// Separator between the date and the time inside the "Open" column.
pub const OPEN_SEPARATOR: &str = " @ ";

const OPEN_COLUMN: &str = "open";
const PNL_COLUMN: &str = "p/l";
const ENTRY_COLUMNS: [&str; 2] = ["entryprice", "entry"];
const EXIT_COLUMNS: [&str; 2] = ["exitprice", "exit"];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// A data row that was dropped during import.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkippedRow {
    /// Line number in the source file (header is line 1).
    pub row: usize,
    pub reason: String,
}

/// Result of importing a trade log.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub records: Vec<TradeRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl LoadReport {
    pub fn rows_read(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    open: usize,
    pnl: usize,
    entry: Option<usize>,
    exit: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, AppError> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

        let open = position_of(&normalized, &[OPEN_COLUMN])
            .ok_or_else(|| AppError::InvalidCsvFormat("missing \"Open\" column".into()))?;
        let pnl = position_of(&normalized, &[PNL_COLUMN])
            .ok_or_else(|| AppError::InvalidCsvFormat("missing \"P/L\" column".into()))?;

        Ok(Self {
            open,
            pnl,
            entry: position_of(&normalized, &ENTRY_COLUMNS),
            exit: position_of(&normalized, &EXIT_COLUMNS),
        })
    }
}

fn position_of(headers: &[String], names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| names.contains(&h.as_str()))
}

fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !matches!(c, ' ' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Read and parse a trade log from disk.
pub async fn load_trades_file(path: &Path) -> Result<LoadReport, AppError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppError::FileNotFound(path.display().to_string()),
            _ => AppError::FileRead(format!("{}: {}", path.display(), e)),
        })?;
    let report = parse_trades_csv(&text)?;
    info!(
        "Loaded {} trades from {} rows of {} ({} skipped)",
        report.records.len(),
        report.rows_read(),
        path.display(),
        report.skipped.len()
    );
    Ok(report)
}

/// Parse CSV text into trade records.
///
/// Only a missing header column fails the whole import. Bad rows are logged,
/// listed in [`LoadReport::skipped`] and otherwise ignored.
pub fn parse_trades_csv(text: &str) -> Result<LoadReport, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = Columns::resolve(&headers)?;
    let mut report = LoadReport::default();

    for (idx, result) in reader.records().enumerate() {
        let fallback_row = idx + 2;
        let parsed = result.map_err(AppError::from).and_then(|record| {
            let row = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(fallback_row);
            parse_row(&record, &columns).map_err(|message| AppError::CsvParseError { row, message })
        });

        match parsed {
            Ok(trade) => report.records.push(trade),
            Err(err) => {
                let (row, reason) = match err {
                    AppError::CsvParseError { row, message } => (row, message),
                    other => (fallback_row, other.to_string()),
                };
                warn!("Skipping trade row {}: {}", row, reason);
                report.skipped.push(SkippedRow { row, reason });
            }
        }
    }

    Ok(report)
}

fn parse_row(record: &csv::StringRecord, columns: &Columns) -> Result<TradeRecord, String> {
    let open = field(record, columns.open, "Open")?;
    let pnl_text = field(record, columns.pnl, "P/L")?;

    let (date, open_time) =
        parse_open(open).ok_or_else(|| format!("unparseable date in Open: {:?}", open))?;
    let (pnl, outcome) =
        parse_pnl(pnl_text).ok_or_else(|| format!("non-numeric P/L: {:?}", pnl_text))?;

    Ok(TradeRecord {
        date,
        open_time,
        pnl,
        outcome,
        entry_price: columns.entry.and_then(|i| record.get(i)).and_then(parse_price),
        exit_price: columns.exit.and_then(|i| record.get(i)).and_then(parse_price),
    })
}

fn field<'r>(record: &'r csv::StringRecord, index: usize, name: &str) -> Result<&'r str, String> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(format!("empty {} column", name)),
        None => Err(format!("missing {} column", name)),
    }
}

/// Split an "Open" value such as `2025-03-05 @ 09:30` into date and time text.
pub fn parse_open(open: &str) -> Option<(NaiveDate, String)> {
    let (date_part, time_part) = match open.split_once(OPEN_SEPARATOR) {
        Some((d, t)) => (d.trim(), t.trim()),
        None => (open.trim(), ""),
    };

    if let Some(date) = parse_date(date_part) {
        return Some((date, time_part.to_string()));
    }
    if !time_part.is_empty() {
        return None;
    }

    DATETIME_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(date_part, fmt)
            .ok()
            .map(|dt| (dt.date(), dt.time().format("%H:%M").to_string()))
    })
}

/// Parse a calendar date in ISO, US slash or "Mar 5, 2025" form.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.contains('/') {
        // %Y would happily read "25" as year 25.
        let fmt = match text.rsplit('/').next() {
            Some(year) if year.len() == 2 => "%m/%d/%y",
            _ => "%m/%d/%Y",
        };
        return NaiveDate::parse_from_str(text, fmt).ok();
    }
    ["%Y-%m-%d", "%b %d, %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Parse a P/L cell such as `$1,250.00` or `-$120.50`.
///
/// The outcome is decided by the text alone: a leading `-` is a loss,
/// anything else (including `$0.00`) is a win.
pub fn parse_pnl(raw: &str) -> Option<(f64, TradeOutcome)> {
    let text = raw.trim();
    let outcome = if text.starts_with('-') {
        TradeOutcome::Loss
    } else {
        TradeOutcome::Win
    };
    let value = parse_money(text)?;
    Some((value, outcome))
}

fn parse_price(raw: &str) -> Option<f64> {
    parse_money(raw.trim())
}

fn parse_money(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
