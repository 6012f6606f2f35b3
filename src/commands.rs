use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::data::loader::{self, SkippedRow};
use crate::engine::aggregate::monthly_breakdown;
use crate::engine::state::update;
use crate::engine::view::{build_view, TradeBook};
use crate::errors::AppError;
use crate::models::view::{Action, CalendarView};
use crate::utils::export;
use crate::AppState;

/// Outcome of a successful trade log import.
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub loaded: usize,
    pub trading_days: usize,
    pub skipped: Vec<SkippedRow>,
}

// ── Data Commands ──

/// Read the configured trade log, replacing whatever was loaded before.
///
/// On failure the session keeps running with an empty book and the error
/// text as its diagnostic.
pub async fn load_trades(state: &mut AppState) -> Result<LoadSummary, AppError> {
    let path = state.config.csv_path.clone();
    match loader::load_trades_file(&path).await {
        Ok(report) => {
            state.book = TradeBook::new(report.records);
            state.diagnostic = None;
            Ok(LoadSummary {
                loaded: state.book.records.len(),
                trading_days: state.book.index.len(),
                skipped: report.skipped,
            })
        }
        Err(err) => {
            warn!("Error loading CSV {}: {}", path.display(), err);
            state.book = TradeBook::default();
            state.diagnostic = Some(err.to_string());
            Err(err)
        }
    }
}

// ── View Commands ──

/// The view for the current selection.
pub fn calendar_view(state: &AppState) -> Result<CalendarView, AppError> {
    build_view(
        &state.book,
        state.holidays.as_ref(),
        &state.view,
        state.diagnostic.as_deref(),
    )
}

/// Apply a user action and return the resulting view.
pub fn dispatch(state: &mut AppState, action: Action) -> Result<CalendarView, AppError> {
    state.view = update(&state.view, action, state.holidays.as_ref());
    calendar_view(state)
}

// ── Export Commands ──

/// Write the HTML report for the current month, with the yearly breakdown.
pub fn export_report(state: &AppState, path: &Path) -> Result<(), AppError> {
    let view = calendar_view(state)?;
    let breakdown = monthly_breakdown(&state.book.records, state.view.year);
    export::write_report_html(&view, &breakdown, path)?;
    info!("HTML report written to {}", path.display());
    Ok(())
}

/// Write one CSV row per trading day in the loaded log.
pub fn export_daily_csv(state: &AppState, path: &Path) -> Result<(), AppError> {
    export::write_daily_csv(&state.book.index, path)?;
    info!("Daily summary written to {}", path.display());
    Ok(())
}

pub fn view_json(state: &AppState) -> Result<String, AppError> {
    export::view_to_json(&calendar_view(state)?)
}

// ── Terminal input ──

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Action(Action),
    ExportHtml(PathBuf),
    ExportCsv(PathBuf),
    Json,
    Help,
    Quit,
}

pub const HELP: &str = "Commands: m <1-12> select month | n next | p previous | d <day> open day | \
c close day | html <path> | csv <path> | json | h help | q quit";

/// Parse a terminal command line.
pub fn parse_input(line: &str) -> Result<Input, String> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next();

    let number = |what: &str| -> Result<u32, String> {
        arg.ok_or_else(|| format!("{} needs a number", what))?
            .parse::<u32>()
            .map_err(|_| format!("{} needs a number", what))
    };
    let path = |what: &str| -> Result<PathBuf, String> {
        arg.map(PathBuf::from)
            .ok_or_else(|| format!("{} needs an output path", what))
    };

    match cmd.as_str() {
        "m" | "month" => Ok(Input::Action(Action::SelectMonth(number("month")?))),
        "n" | "next" => Ok(Input::Action(Action::NextMonth)),
        "p" | "prev" => Ok(Input::Action(Action::PreviousMonth)),
        "d" | "day" => Ok(Input::Action(Action::ClickDay(number("day")?))),
        "c" | "close" => Ok(Input::Action(Action::CloseDay)),
        "html" => Ok(Input::ExportHtml(path("html")?)),
        "csv" => Ok(Input::ExportCsv(path("csv")?)),
        "json" => Ok(Input::Json),
        "h" | "help" | "?" => Ok(Input::Help),
        "q" | "quit" | "exit" => Ok(Input::Quit),
        other => Err(format!("Unknown command {:?}. {}", other, HELP)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::holidays::HolidayTable;
    use crate::models::config::AppConfig;
    use crate::models::view::ViewMode;

    const CSV: &str = "Open,P/L\n\
                       2025-03-05 @ 09:30,-$120.50\n\
                       2025-03-05 @ 10:00,$300.00\n\
                       bad @ row,$1.00\n\
                       2025-03-08 @ 10:00,$5.00\n";

    fn state_for(csv_path: PathBuf) -> AppState {
        let config = AppConfig {
            csv_path,
            initial_month: 3,
            ..Default::default()
        };
        AppState::new(config, Box::new(HolidayTable::us_market_2025()))
    }

    #[tokio::test]
    async fn test_load_trades() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut state = state_for(path);
        let summary = load_trades(&mut state).await.unwrap();
        assert_eq!(summary.loaded, 3);
        assert_eq!(summary.trading_days, 2);
        assert_eq!(summary.skipped.len(), 1);
        assert!(state.diagnostic.is_none());
    }

    #[tokio::test]
    async fn test_load_failure_leaves_empty_calendar() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_for(dir.path().join("missing.csv"));
        assert!(load_trades(&mut state).await.is_err());

        let view = calendar_view(&state).unwrap();
        assert_eq!(view.yearly.total_trades, 0);
        assert_eq!(view.monthly.win_rate, 0.0);
        assert!(view.diagnostic.unwrap().contains("missing.csv"));
    }

    #[tokio::test]
    async fn test_dispatch_flow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        std::fs::write(&path, CSV).unwrap();
        let mut state = state_for(path);
        load_trades(&mut state).await.unwrap();

        // Saturday with a trade stays disabled.
        let view = dispatch(&mut state, Action::ClickDay(8)).unwrap();
        assert!(view.detail.is_none());
        assert_eq!(view.suppressed.len(), 1);

        let view = dispatch(&mut state, Action::ClickDay(5)).unwrap();
        let detail = view.detail.unwrap();
        assert_eq!(detail.summary.total_trades, 2);
        assert!((detail.summary.total_pl - 179.5).abs() < 1e-9);

        let view = dispatch(&mut state, Action::SelectMonth(4)).unwrap();
        assert!(view.detail.is_none());
        assert_eq!(state.view.mode, ViewMode::MonthGrid);
        assert_eq!(view.month_name, "April");
    }

    #[tokio::test]
    async fn test_exports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        std::fs::write(&path, CSV).unwrap();
        let mut state = state_for(path);
        load_trades(&mut state).await.unwrap();

        let html = dir.path().join("report.html");
        export_report(&state, &html).unwrap();
        assert!(std::fs::read_to_string(&html).unwrap().contains("March 2025"));

        let daily = dir.path().join("daily.csv");
        export_daily_csv(&state, &daily).unwrap();
        assert_eq!(std::fs::read_to_string(&daily).unwrap().lines().count(), 3);

        assert!(view_json(&state).unwrap().contains("\"month\": 3"));
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("m 3"), Ok(Input::Action(Action::SelectMonth(3))));
        assert_eq!(parse_input("D 12"), Ok(Input::Action(Action::ClickDay(12))));
        assert_eq!(parse_input("n"), Ok(Input::Action(Action::NextMonth)));
        assert_eq!(parse_input("close"), Ok(Input::Action(Action::CloseDay)));
        assert_eq!(parse_input("html out.html"), Ok(Input::ExportHtml(PathBuf::from("out.html"))));
        assert_eq!(parse_input("q"), Ok(Input::Quit));
        assert!(parse_input("m").is_err());
        assert!(parse_input("d x").is_err());
        assert!(parse_input("csv").is_err());
        assert!(parse_input("launch").is_err());
    }
}
