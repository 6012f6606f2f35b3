pub mod commands;
pub mod data;
pub mod engine;
pub mod errors;
pub mod models;
pub mod utils;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::Input;
use crate::data::holidays::{HolidayCalendar, HolidayTable};
use crate::engine::view::TradeBook;
use crate::models::config::AppConfig;
use crate::models::view::ViewState;
use crate::utils::render::render_text;

/// Session state, owned by the single front end driving it.
pub struct AppState {
    pub config: AppConfig,
    pub book: TradeBook,
    pub holidays: Box<dyn HolidayCalendar>,
    pub view: ViewState,
    /// Why the trade log is unavailable, if it is.
    pub diagnostic: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, holidays: Box<dyn HolidayCalendar>) -> Self {
        let view = ViewState::new(config.year, config.initial_month);
        Self {
            config,
            book: TradeBook::default(),
            holidays,
            view,
            diagnostic: None,
        }
    }
}

/// Holiday source named by the config, or the built-in table.
fn load_holidays(config: &AppConfig) -> anyhow::Result<Box<dyn HolidayCalendar>> {
    match &config.holidays_path {
        Some(path) => {
            let table = HolidayTable::from_path(path)
                .with_context(|| format!("loading holidays from {}", path.display()))?;
            info!(
                "Loaded {} holidays from {} ({} in {})",
                table.len(),
                path.display(),
                table.for_year(config.year).count(),
                config.year
            );
            Ok(Box::new(table))
        }
        None => Ok(Box::new(HolidayTable::us_market_2025())),
    }
}

/// Entry point for the `trading-calendar` binary. The first argument, if
/// given, is a JSON config file.
pub fn run() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Trading Calendar ({} / month {})", config.year, config.initial_month);

    let holidays = load_holidays(&config)?;
    let mut state = AppState::new(config, holidays);

    // The trade log is read once, up front.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")?;
    match runtime.block_on(commands::load_trades(&mut state)) {
        Ok(summary) => info!(
            "Ready: {} trades over {} trading days",
            summary.loaded, summary.trading_days
        ),
        Err(e) => warn!("Continuing with an empty calendar: {}", e),
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_terminal(&mut state, stdin.lock(), stdout.lock())
}

/// Drive the session from line commands until `q` or end of input.
pub fn run_terminal<R: BufRead, W: Write>(
    state: &mut AppState,
    input: R,
    mut output: W,
) -> anyhow::Result<()> {
    match commands::calendar_view(state) {
        Ok(view) => write!(output, "{}", render_text(&view))?,
        Err(e) => writeln!(output, "Cannot show calendar: {}", e)?,
    }
    writeln!(output, "{}", commands::HELP)?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match commands::parse_input(line) {
            Ok(Input::Quit) => break,
            Ok(Input::Help) => writeln!(output, "{}", commands::HELP)?,
            Ok(Input::Action(action)) => match commands::dispatch(state, action) {
                Ok(view) => write!(output, "{}", render_text(&view))?,
                Err(e) => writeln!(output, "Cannot show calendar: {}", e)?,
            },
            Ok(Input::ExportHtml(path)) => match commands::export_report(state, &path) {
                Ok(()) => writeln!(output, "Wrote {}", path.display())?,
                Err(e) => writeln!(output, "Export failed: {}", e)?,
            },
            Ok(Input::ExportCsv(path)) => match commands::export_daily_csv(state, &path) {
                Ok(()) => writeln!(output, "Wrote {}", path.display())?,
                Err(e) => writeln!(output, "Export failed: {}", e)?,
            },
            Ok(Input::Json) => writeln!(output, "{}", commands::view_json(state)?)?,
            Err(msg) => writeln!(output, "{}", msg)?,
        }
        output.flush()?;
    }

    info!("Session closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_trades_csv;
    use crate::models::view::ViewMode;

    fn session() -> AppState {
        let mut state = AppState::new(
            AppConfig::default(),
            Box::new(HolidayTable::us_market_2025()),
        );
        let csv = "Open,P/L\n2025-01-02 @ 09:30,$75.00\n2025-02-03 @ 09:30,-$20.00\n";
        state.book = TradeBook::new(parse_trades_csv(csv).unwrap().records);
        state
    }

    #[test]
    fn test_terminal_session() {
        let mut state = session();
        let input = b"d 2\nc\nm 2\nbogus\nq\nm 5\n";
        let mut output = Vec::new();
        run_terminal(&mut state, &input[..], &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Trading Calendar - January 2025"));
        assert!(text.contains("Details for Thursday, January 2, 2025"));
        assert!(text.contains("Trading Calendar - February 2025"));
        assert!(text.contains("Unknown command"));
        // Input after `q` is not processed.
        assert_eq!(state.view, ViewState::new(2025, 2));
        assert_eq!(state.view.mode, ViewMode::MonthGrid);
    }

    #[test]
    fn test_terminal_ignores_disabled_day() {
        let mut state = session();
        let mut output = Vec::new();
        run_terminal(&mut state, &b"d 1\n"[..], &mut output).unwrap();
        assert_eq!(state.view.selected_day(), None);
    }

    #[test]
    fn test_terminal_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily.csv");
        let mut state = session();
        let input = format!("csv {}\n", path.display());
        let mut output = Vec::new();
        run_terminal(&mut state, input.as_bytes(), &mut output).unwrap();
        assert!(String::from_utf8(output).unwrap().contains("Wrote"));
        assert!(path.exists());
    }

    #[test]
    fn test_terminal_survives_view_error() {
        let mut state = session();
        state.view = ViewState::new(2025, 13);
        let mut output = Vec::new();
        run_terminal(&mut state, &b"d 5\nm 3\n"[..], &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Cannot show calendar"));
        assert!(text.contains("Trading Calendar - March 2025"));
    }

    #[test]
    fn test_load_holidays_default() {
        let holidays = load_holidays(&AppConfig::default()).unwrap();
        let july4 = chrono::NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        assert_eq!(holidays.holiday_name(july4), Some("Independence Day"));
    }
}
