use std::fmt::Write as FmtWrite;
use std::io::Write;
use std::path::Path;

use crate::engine::aggregate::DailyIndex;
use crate::engine::view::month_name;
use crate::errors::AppError;
use crate::models::calendar::DayStatus;
use crate::models::summary::Summary;
use crate::models::view::CalendarView;

/// Write one row per trading day: date, counts, P/L and win rate.
pub fn write_daily_csv(index: &DailyIndex, path: &Path) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::FileWrite(format!("Cannot create CSV: {}", e)))?;

    wtr.write_record(["Date", "Trades", "Wins", "Losses", "P/L", "Win Rate %"])
        .map_err(|e| AppError::FileWrite(e.to_string()))?;

    for (date, s) in index.iter() {
        wtr.write_record([
            &date.format("%Y-%m-%d").to_string(),
            &s.total_trades.to_string(),
            &s.total_wins.to_string(),
            &s.total_losses.to_string(),
            &format!("{:.2}", s.total_pl),
            &format!("{:.2}", s.win_rate),
        ])
        .map_err(|e| AppError::FileWrite(e.to_string()))?;
    }

    wtr.flush().map_err(|e| AppError::FileWrite(e.to_string()))?;
    Ok(())
}

/// Serialize the view model for an external front end.
pub fn view_to_json(view: &CalendarView) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(view)?)
}

/// Background color for a cell state.
fn status_color(status: DayStatus) -> &'static str {
    match status {
        DayStatus::Profit => "#4CAF50",
        DayStatus::Loss => "#FF6347",
        DayStatus::Flat | DayStatus::Empty => "lightgray",
        DayStatus::Weekend => "gray",
        DayStatus::Holiday => "#6A0DAD",
    }
}

/// Write a standalone HTML page with the month grid, stats cards and the
/// month-by-month breakdown for the view's year.
pub fn write_report_html(
    view: &CalendarView,
    breakdown: &[(u32, Summary)],
    path: &Path,
) -> Result<(), AppError> {
    let html = render_report_html(view, breakdown);
    let mut file = std::fs::File::create(path)
        .map_err(|e| AppError::FileWrite(format!("Cannot create HTML: {}", e)))?;
    file.write_all(html.as_bytes())
        .map_err(|e| AppError::FileWrite(e.to_string()))?;
    Ok(())
}

pub fn render_report_html(view: &CalendarView, breakdown: &[(u32, Summary)]) -> String {
    let mut html = String::with_capacity(64 * 1024);

    // ── HTML head ──
    write!(html, r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{}</title>
<style>
body {{ background:#f4f7f6; color:#333; font-family:'Roboto',sans-serif; padding:30px; max-width:1200px; margin:0 auto; }}
h1 {{ font-size:2.5rem; margin-bottom:20px; }}
.timestamp {{ color:#888; font-size:0.8rem; margin-bottom:24px; }}
.main {{ display:flex; justify-content:space-between; align-items:flex-start; gap:30px; }}
.calendar {{ flex:1; display:grid; grid-template-columns:repeat(7,1fr); gap:15px; }}
.weekday {{ font-size:1.2rem; font-weight:bold; }}
.day {{ padding:5px 20px; border-radius:8px; color:white; font-weight:bold; box-shadow:0 4px 6px rgba(0,0,0,0.1); display:flex; flex-direction:column; justify-content:space-between; min-height:90px; }}
.day.disabled {{ opacity:0.5; cursor:not-allowed; }}
.day .num {{ font-size:1.2rem; align-self:flex-start; }}
.day .pl {{ font-size:1.1rem; text-align:center; }}
.day .count {{ font-size:0.6rem; text-align:center; margin-bottom:6px; }}
.stats {{ flex:0.35; }}
.card {{ background:#fff; padding:20px; border-radius:8px; box-shadow:0 4px 6px rgba(0,0,0,0.1); margin-bottom:30px; }}
.warning {{ background:#fff8e1; border-left:4px solid #f0ad4e; }}
table {{ width:100%; border-collapse:collapse; font-size:0.85rem; }}
th, td {{ padding:6px 8px; border-bottom:1px solid #ddd; text-align:left; }}
.positive {{ color:#4CAF50; }}
.negative {{ color:#FF6347; }}
</style>
</head>
<body>
<h1>{}</h1>
<p class="timestamp">Generated: {}</p>
"#, view.title, view.title, chrono::Local::now().format("%Y-%m-%d %H:%M:%S")).ok();

    if let Some(diag) = &view.diagnostic {
        write!(html, r#"<div class="card warning"><strong>Trade log unavailable:</strong> {}</div>"#, escape(diag)).ok();
    }

    // ── Month grid ──
    html.push_str(r#"<div class="main"><div class="calendar">"#);
    for header in &view.weekday_headers {
        write!(html, r#"<div class="weekday">{}</div>"#, header).ok();
    }
    for cell in &view.cells {
        let Some(cell) = cell else {
            html.push_str("<div></div>");
            continue;
        };
        let disabled = if cell.is_disabled() { " disabled" } else { "" };
        write!(
            html,
            r#"<div class="day{}" style="background:{}" title="{}"><div class="num">{}</div><div class="pl">P/L: ${:.2}</div><div class="count">Total Trades: {}</div></div>"#,
            disabled,
            status_color(cell.status),
            escape(&cell.title),
            cell.day,
            cell.summary.total_pl,
            cell.summary.total_trades
        )
        .ok();
    }
    html.push_str("</div>");

    // ── Stats cards ──
    html.push_str(r#"<div class="stats">"#);
    write_stats_card(&mut html, "Yearly Stats", &view.yearly);
    write_stats_card(&mut html, "Monthly Stats", &view.monthly);
    html.push_str("</div></div>");

    // ── Suppressed days ──
    if !view.suppressed.is_empty() {
        html.push_str(r#"<div class="card warning"><h3>Trades on closed days</h3><table><thead><tr><th>Date</th><th>Reason</th><th>Trades</th><th>P/L</th></tr></thead><tbody>"#);
        for s in &view.suppressed {
            write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>${:.2}</td></tr>",
                s.date, s.status, s.summary.total_trades, s.summary.total_pl
            )
            .ok();
        }
        html.push_str("</tbody></table></div>");
    }

    // ── Monthly breakdown ──
    if !breakdown.is_empty() {
        write!(html, r#"<div class="card"><h3>{} by Month</h3><table><thead><tr>"#, view.year).ok();
        for h in &["Month", "Trades", "Wins", "Losses", "P/L", "Win Rate"] {
            write!(html, "<th>{}</th>", h).ok();
        }
        html.push_str("</tr></thead><tbody>");
        for (month, s) in breakdown {
            let pl_class = if s.total_pl >= 0.0 { "positive" } else { "negative" };
            write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">${:.2}</td><td>{:.2}%</td></tr>",
                month_name(*month).unwrap_or("?"),
                s.total_trades,
                s.total_wins,
                s.total_losses,
                pl_class,
                s.total_pl,
                s.win_rate
            )
            .ok();
        }
        html.push_str("</tbody></table></div>");
    }

    html.push_str("</body></html>");
    html
}

fn write_stats_card(html: &mut String, heading: &str, s: &Summary) {
    write!(
        html,
        r#"<div class="card"><h2>{}:</h2><p>Total Trades: {}</p><p>Total Wins: {}</p><p>Total Losses: {}</p><p>Total P/L: ${:.2}</p><p>Win Rate: {:.2}%</p></div>"#,
        heading, s.total_trades, s.total_wins, s.total_losses, s.total_pl, s.win_rate
    )
    .ok();
}

/// Minimal escaping for text placed inside HTML attributes and bodies.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
