pub mod report;
pub mod summary;
pub mod thresholds;

pub use report::{CallerReport, TpStudy};
pub use summary::{summarize, TradeSummary};
pub use thresholds::{
    best_thresholds, expected_returns, sweep_thresholds, threshold_grid, threshold_stats,
    ThresholdStat,
};
