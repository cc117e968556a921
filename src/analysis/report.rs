use serde::Serialize;

use crate::analysis::summary::{summarize, TradeSummary};
use crate::analysis::thresholds::{best_thresholds, threshold_stats, ThresholdStat};
use crate::models::TradeSet;

pub const BEST_TP_COUNT: usize = 3;
pub const TP_SHORT_WINDOW: usize = 25;
pub const TP_LONG_WINDOW: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct CallerReport {
    pub caller: String,
    pub label: String,
    pub summary: TradeSummary,
    pub thresholds: Vec<ThresholdStat>,
    /// `(threshold, expected return)`, best first.
    pub best: Vec<(f64, f64)>,
}

impl CallerReport {
    pub fn build(caller: &str, label: impl Into<String>, trades: &TradeSet) -> Self {
        Self {
            caller: caller.to_string(),
            label: label.into(),
            summary: summarize(trades.as_slice()),
            thresholds: threshold_stats(trades.as_slice()),
            best: best_thresholds(trades.as_slice(), BEST_TP_COUNT),
        }
    }

    pub fn print_summary(&self) {
        println!();
        println!("  {} | {}", self.caller, self.label);
        println!("  ───────────────────────────────────");
        println!("{}", self.summary);
        println!("  ───────────────────────────────────");
    }

    pub fn print_hit_rates(&self) {
        println!("  TP HIT RATES ({})", self.label);
        for s in &self.thresholds {
            println!("  TP: {:.1}x | Hit Rate: {:.1}%", s.threshold, s.hit_rate);
        }
    }

    pub fn print_best(&self) {
        println!("  BEST {} TPs ({})", self.best.len(), self.label);
        for (tp, er) in &self.best {
            println!("  TP: {:.1}x | Expected Return: ${:.2} per $100 trade", tp, er);
        }
    }
}

/// Take-profit study over the most recent 25 and 50 calls.
#[derive(Debug, Clone, Serialize)]
pub struct TpStudy {
    pub short: CallerReport,
    pub long: CallerReport,
    /// Fewer than 25 trades were available, so both windows use all of them.
    pub reused: bool,
}

impl TpStudy {
    pub fn build(caller: &str, trades: &TradeSet) -> Self {
        let reused = trades.len() < TP_SHORT_WINDOW;
        let (short, long) = if reused {
            (trades.clone(), trades.clone())
        } else {
            (trades.head(TP_SHORT_WINDOW), trades.head(TP_LONG_WINDOW))
        };

        Self {
            short: CallerReport::build(caller, format!("Last {} calls", TP_SHORT_WINDOW), &short),
            long: CallerReport::build(caller, format!("Last {} calls", TP_LONG_WINDOW), &long),
            reused,
        }
    }

    pub fn print(&self) {
        if self.reused {
            println!(
                "WARNING: only {} trades available. Using the same set for both windows.",
                self.short.summary.total
            );
        }
        for report in [&self.short, &self.long] {
            report.print_summary();
            report.print_hit_rates();
            println!();
            report.print_best();
        }
    }
}
