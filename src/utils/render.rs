use std::fmt::Write;

use crate::models::calendar::{DayCell, DayStatus};
use crate::models::summary::Summary;
use crate::models::view::{CalendarView, DayDetail};

const CELL_WIDTH: usize = 18;

/// Render the view as plain text for a terminal. Month grid mode shows the
/// grid and stats; day detail mode shows only the detail.
pub fn render_text(view: &CalendarView) -> String {
    let mut out = String::with_capacity(4096);
    writeln!(out, "{}", view.title).ok();
    writeln!(out, "{}", "=".repeat(view.title.len())).ok();

    if let Some(diag) = &view.diagnostic {
        writeln!(out, "! Trade log unavailable: {}", diag).ok();
    }

    match &view.detail {
        Some(detail) => render_detail(&mut out, detail),
        None => {
            render_grid(&mut out, view);
            writeln!(out).ok();
            render_summary(&mut out, "Yearly Stats", &view.yearly);
            render_summary(&mut out, "Monthly Stats", &view.monthly);
            if !view.suppressed.is_empty() {
                writeln!(out, "Trades on closed days:").ok();
                for s in &view.suppressed {
                    writeln!(
                        out,
                        "  {} ({}): {} trades, P/L ${:.2}",
                        s.date, s.status, s.summary.total_trades, s.summary.total_pl
                    )
                    .ok();
                }
            }
        }
    }
    out
}

fn render_grid(out: &mut String, view: &CalendarView) {
    for header in &view.weekday_headers {
        write!(out, "{:<width$}", header, width = CELL_WIDTH).ok();
    }
    writeln!(out).ok();

    for week in view.cells.chunks(7) {
        for slot in week {
            let text = slot.as_ref().map(cell_text).unwrap_or_default();
            write!(out, "{:<width$}", text, width = CELL_WIDTH).ok();
        }
        writeln!(out).ok();
    }
    writeln!(out, "+ profit  - loss  = flat  W weekend  H holiday").ok();
}

fn cell_text(cell: &DayCell) -> String {
    let marker = match cell.status {
        DayStatus::Profit => '+',
        DayStatus::Loss => '-',
        DayStatus::Flat => '=',
        DayStatus::Empty => ' ',
        DayStatus::Weekend => 'W',
        DayStatus::Holiday => 'H',
    };
    if cell.summary.is_empty() {
        format!("{:>2}{}", cell.day, marker)
    } else {
        format!(
            "{:>2}{} {:.2} ({})",
            cell.day, marker, cell.summary.total_pl, cell.summary.total_trades
        )
    }
}

fn render_summary(out: &mut String, heading: &str, s: &Summary) {
    writeln!(out, "{}:", heading).ok();
    writeln!(out, "  Total Trades: {}", s.total_trades).ok();
    writeln!(out, "  Total Wins: {}", s.total_wins).ok();
    writeln!(out, "  Total Losses: {}", s.total_losses).ok();
    writeln!(out, "  Total P/L: ${:.2}", s.total_pl).ok();
    writeln!(out, "  Win Rate: {:.2}%", s.win_rate).ok();
}

fn render_detail(out: &mut String, detail: &DayDetail) {
    let s = &detail.summary;
    writeln!(out, "Details for {}", detail.date.format("%A, %B %-d, %Y")).ok();
    writeln!(out, "  P/L: ${:.2}", s.total_pl).ok();
    writeln!(out, "  Trades: {}", s.total_trades).ok();
    writeln!(out, "  Wins/Losses: {}/{}", s.total_wins, s.total_losses).ok();
    writeln!(out, "  Win Rate: {:.2}%", s.win_rate).ok();

    if detail.trades.is_empty() {
        writeln!(out, "No trades recorded.").ok();
        return;
    }
    writeln!(out, "Trade Breakdown:").ok();
    for (i, t) in detail.trades.iter().enumerate() {
        writeln!(
            out,
            "  #{} {:<8} {:<5} P/L ${:.2}  entry {}  exit {}",
            i + 1,
            t.open_time,
            t.result,
            t.pnl,
            price(t.entry_price),
            price(t.exit_price)
        )
        .ok();
    }
}

fn price(value: Option<f64>) -> String {
    value
        .map(|v| format!("${}", v))
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::holidays::HolidayTable;
    use crate::data::loader::parse_trades_csv;
    use crate::engine::state::update;
    use crate::engine::view::{build_view, TradeBook};
    use crate::models::view::{Action, ViewState};

    fn book() -> TradeBook {
        let csv = "Open,P/L,Entry Price\n\
                   2025-01-02 @ 09:30,$100.00,5900.5\n\
                   2025-01-02 @ 10:30,-$40.00,\n";
        TradeBook::new(parse_trades_csv(csv).unwrap().records)
    }

    #[test]
    fn test_render_month_grid() {
        let holidays = HolidayTable::us_market_2025();
        let view = build_view(&book(), &holidays, &ViewState::new(2025, 1), None).unwrap();
        let text = render_text(&view);
        assert!(text.starts_with("Trading Calendar - January 2025\n"));
        assert!(text.contains(" 1H"));
        assert!(text.contains(" 2+ 60.00 (2)"));
        assert!(text.contains(" 4W"));
        assert!(text.contains("Yearly Stats:"));
        assert!(text.contains("  Win Rate: 50.00%"));
        // Header plus 5 weeks.
        let grid_rows = text.lines().skip(2).take_while(|l| !l.starts_with('+')).count();
        assert_eq!(grid_rows, 6);
    }

    #[test]
    fn test_render_disabled_day_with_trades() {
        let csv = "Open,P/L\n2025-01-04 @ 09:30,$25.00\n";
        let book = TradeBook::new(parse_trades_csv(csv).unwrap().records);
        let holidays = HolidayTable::us_market_2025();
        let view = build_view(&book, &holidays, &ViewState::new(2025, 1), None).unwrap();
        let text = render_text(&view);
        assert!(text.contains(" 4W 25.00 (1)"));
        assert!(text.contains(" 5W "));
    }

    #[test]
    fn test_render_day_detail_hides_stats() {
        let holidays = HolidayTable::us_market_2025();
        let state = update(&ViewState::new(2025, 1), Action::ClickDay(2), &holidays);
        let view = build_view(&book(), &holidays, &state, None).unwrap();
        let text = render_text(&view);
        assert!(text.contains("Details for Thursday, January 2, 2025"));
        assert!(text.contains("Wins/Losses: 1/1"));
        assert!(text.contains("entry $5900.5"));
        assert!(text.contains("exit n/a"));
        assert!(!text.contains("Yearly Stats"));
    }

    #[test]
    fn test_render_diagnostic() {
        let holidays = HolidayTable::us_market_2025();
        let view = build_view(
            &TradeBook::default(),
            &holidays,
            &ViewState::new(2025, 1),
            Some("File not found: output.csv"),
        )
        .unwrap();
        let text = render_text(&view);
        assert!(text.contains("! Trade log unavailable: File not found: output.csv"));
        assert!(text.contains("  Total P/L: $0.00"));
    }
}
