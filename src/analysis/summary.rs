use serde::Serialize;
use std::fmt;

use crate::models::Trade;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TradeSummary {
    pub total: usize,
    pub avg_multiplier: f64,
    pub median_multiplier: f64,
    pub win_rate_pct: f64,
}

/// Count, mean and median multiplier, and the share of calls that hit 2x.
/// An empty slice yields the all-zero summary.
pub fn summarize(trades: &[Trade]) -> TradeSummary {
    let total = trades.len();
    if total == 0 {
        return TradeSummary::default();
    }

    let multipliers: Vec<f64> = trades.iter().map(Trade::multiplier).collect();
    let avg_multiplier = multipliers.iter().sum::<f64>() / total as f64;
    let wins = trades.iter().filter(|t| t.is_win()).count();

    TradeSummary {
        total,
        avg_multiplier,
        median_multiplier: median(&multipliers),
        win_rate_pct: wins as f64 / total as f64 * 100.0,
    }
}

/// Even-length input averages the two middle values. Empty input is 0.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

impl fmt::Display for TradeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Trades:   {}", self.total)?;
        writeln!(f, "  Avg:      {:.2}x", self.avg_multiplier)?;
        writeln!(f, "  Median:   {:.2}x", self.median_multiplier)?;
        write!(f, "  Winrate:  {:.1}%", self.win_rate_pct)
    }
}
