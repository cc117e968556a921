use serde::Serialize;

use crate::models::Trade;

/// Take-profit grid: 1.6x to 2.8x in 0.1 steps.
const GRID_START_TENTHS: u32 = 16;
const GRID_END_TENTHS: u32 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdStat {
    pub threshold: f64,
    pub hit_rate: f64,
    pub expected_return: f64,
}

/// The fixed 13-point grid, ascending.
pub fn threshold_grid() -> Vec<f64> {
    (GRID_START_TENTHS..=GRID_END_TENTHS)
        .map(|t| f64::from(t) / 10.0)
        .collect()
}

/// Percent of trades whose multiplier reached `threshold`; 0 for no trades.
pub fn hit_rate(trades: &[Trade], threshold: f64) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let hits = trades.iter().filter(|t| t.hits(threshold)).count();
    hits as f64 / trades.len() as f64 * 100.0
}

/// Profit per 100 staked when every call is sold at `threshold` or lost
/// entirely: `100 * (p * t - (1 - p))`.
pub fn expected_return(hit_rate_pct: f64, threshold: f64) -> f64 {
    let p = hit_rate_pct / 100.0;
    100.0 * (p * threshold - (1.0 - p))
}

/// Hit rate and expected return for every grid point, ascending by threshold.
pub fn threshold_stats(trades: &[Trade]) -> Vec<ThresholdStat> {
    threshold_grid()
        .into_iter()
        .map(|threshold| {
            let hit_rate = hit_rate(trades, threshold);
            ThresholdStat {
                threshold,
                hit_rate,
                expected_return: expected_return(hit_rate, threshold),
            }
        })
        .collect()
}

/// `(threshold, hit rate %)` for every grid point.
pub fn sweep_thresholds(trades: &[Trade]) -> Vec<(f64, f64)> {
    threshold_stats(trades)
        .into_iter()
        .map(|s| (s.threshold, s.hit_rate))
        .collect()
}

/// `(threshold, expected return)` for every grid point.
pub fn expected_returns(trades: &[Trade]) -> Vec<(f64, f64)> {
    threshold_stats(trades)
        .into_iter()
        .map(|s| (s.threshold, s.expected_return))
        .collect()
}

/// The `top_n` thresholds by expected return, best first. The sort is stable
/// over the ascending grid, so ties keep the lower threshold first.
pub fn best_thresholds(trades: &[Trade], top_n: usize) -> Vec<(f64, f64)> {
    let mut ranked = expected_returns(trades);
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(top_n);
    ranked
}
