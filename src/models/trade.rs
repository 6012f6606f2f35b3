use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of a trade, decided by the sign written in the P/L column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TradeOutcome {
    Win,
    Loss,
}

impl TradeOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            TradeOutcome::Win => "Win",
            TradeOutcome::Loss => "Loss",
        }
    }
}

/// A single closed trade read from the trade log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeRecord {
    /// Calendar date taken from the "Open" column.
    pub date: NaiveDate,
    /// Time text after the `" @ "` separator, empty when absent.
    pub open_time: String,
    pub pnl: f64,
    pub outcome: TradeOutcome,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
}

impl TradeRecord {
    pub fn is_win(&self) -> bool {
        self.outcome == TradeOutcome::Win
    }
}
