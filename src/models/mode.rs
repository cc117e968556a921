use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

use crate::models::TradeSet;

/// How much history one acquisition run should load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum AcquisitionMode {
    /// The `n` most recent calls.
    ByCallCount(usize),
    /// Every call made in the last `days` days.
    ByDayWindow(u32),
    /// Every call made in the last 24 hours.
    ByRecentWindow24h,
}

impl AcquisitionMode {
    /// Time window covered by the window-based modes.
    pub fn window(&self) -> Option<Duration> {
        match self {
            AcquisitionMode::ByCallCount(_) => None,
            AcquisitionMode::ByDayWindow(days) => Some(Duration::days(i64::from(*days))),
            AcquisitionMode::ByRecentWindow24h => Some(Duration::days(1)),
        }
    }

    /// Oldest instant inside the window. `None` for call counts, and for
    /// windows reaching past the representable range.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.window().and_then(|window| now.checked_sub_signed(window))
    }

    /// Stopping predicate, judged on what has loaded so far. Window modes
    /// look at the frontier (oldest loaded) trade: once it falls outside the
    /// window, the window is fully covered.
    pub fn is_satisfied(&self, trades: &TradeSet, now: DateTime<Utc>) -> bool {
        match (self, self.cutoff(now)) {
            (AcquisitionMode::ByCallCount(n), _) => trades.len() >= *n,
            (_, Some(cutoff)) => trades
                .frontier()
                .map(|oldest| oldest.timestamp() < cutoff)
                .unwrap_or(false),
            (_, None) => false,
        }
    }

    /// Trim what the last round overshot: exact cap for call counts, window
    /// filter for time-based modes.
    pub fn finalize(&self, trades: TradeSet, now: DateTime<Utc>) -> TradeSet {
        match (self, self.cutoff(now)) {
            (AcquisitionMode::ByCallCount(n), _) => trades.head(*n),
            (_, Some(cutoff)) => trades.since(cutoff),
            (_, None) => trades,
        }
    }

    pub fn label(&self) -> String {
        match self {
            AcquisitionMode::ByCallCount(n) => format!("Last {} calls", n),
            AcquisitionMode::ByDayWindow(1) => "Last 1 day".to_string(),
            AcquisitionMode::ByDayWindow(d) => format!("Last {} days", d),
            AcquisitionMode::ByRecentWindow24h => "Last 24h".to_string(),
        }
    }
}

impl fmt::Display for AcquisitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
