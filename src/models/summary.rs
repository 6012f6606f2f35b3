use serde::{Deserialize, Serialize};

use super::trade::TradeRecord;

/// Trade statistics over a set of records (a day, a month, or the whole log).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub total_trades: usize,
    pub total_wins: usize,
    pub total_losses: usize,
    /// Sum of P/L at full precision. Round only when displaying.
    pub total_pl: f64,
    /// Percentage in [0, 100], rounded to 2 decimals. Zero when there are no trades.
    pub win_rate: f64,
}

impl Summary {
    /// Summarize every record yielded by `records`.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TradeRecord>,
    {
        let mut summary = Summary::default();
        for record in records {
            summary.push(record);
        }
        summary
    }

    /// Fold one more record into the summary, keeping the win rate current.
    pub fn push(&mut self, record: &TradeRecord) {
        self.total_trades += 1;
        if record.is_win() {
            self.total_wins += 1;
        } else {
            self.total_losses += 1;
        }
        self.total_pl += record.pnl;
        self.win_rate = win_rate(self.total_wins, self.total_trades);
    }

    pub fn is_empty(&self) -> bool {
        self.total_trades == 0
    }
}

/// Winning trades as a percentage of all trades, rounded to 2 decimals.
pub fn win_rate(wins: usize, total_trades: usize) -> f64 {
    if total_trades == 0 {
        return 0.0;
    }
    let pct = wins as f64 / total_trades as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trade::TradeOutcome;
    use chrono::NaiveDate;

    fn make_record(pnl: f64, outcome: TradeOutcome) -> TradeRecord {
        TradeRecord {
            date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
            open_time: "09:30".to_string(),
            pnl,
            outcome,
            entry_price: None,
            exit_price: None,
        }
    }

    #[test]
    fn test_win_rate_zero_trades() {
        assert_eq!(win_rate(0, 0), 0.0);
    }

    #[test]
    fn test_win_rate_rounds_to_two_decimals() {
        assert_eq!(win_rate(2, 3), 66.67);
        assert_eq!(win_rate(1, 3), 33.33);
        assert_eq!(win_rate(3, 3), 100.0);
    }

    #[test]
    fn test_summary_from_records() {
        let records = vec![
            make_record(500.0, TradeOutcome::Win),
            make_record(-120.5, TradeOutcome::Loss),
            make_record(0.0, TradeOutcome::Win),
        ];
        let s = Summary::from_records(&records);
        assert_eq!(s.total_trades, 3);
        assert_eq!(s.total_wins, 2);
        assert_eq!(s.total_losses, 1);
        assert!((s.total_pl - 379.5).abs() < 1e-9);
        assert_eq!(s.win_rate, 66.67);
    }

    #[test]
    fn test_empty_summary() {
        let s = Summary::from_records(std::iter::empty());
        assert!(s.is_empty());
        assert_eq!(s.win_rate, 0.0);
        assert_eq!(s.total_pl, 0.0);
    }
}
