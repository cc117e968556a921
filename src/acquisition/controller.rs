use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AcquisitionError;
use crate::models::{AcquisitionMode, TradeSet};
use crate::parsing::RecordParser;
use crate::source::CallSource;

/// Why the load loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The mode's stopping predicate held.
    Satisfied,
    /// A reveal reported success but no new blocks appeared.
    Stalled,
    /// The "load more" control is gone.
    Exhausted,
    /// The "load more" control never became actionable.
    TimedOut,
    /// Hit the round bound.
    RoundLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::Satisfied => "satisfied",
            StopReason::Stalled => "stalled",
            StopReason::Exhausted => "exhausted",
            StopReason::TimedOut => "timed out",
            StopReason::RoundLimit => "round limit",
        };
        write!(f, "{}", s)
    }
}

/// One "load more" interaction.
///
/// `Idle -> Polling -> Revealed | Stalled`, or straight from `Idle` to
/// `Exhausted` / `TimedOut` when the control is absent or unresponsive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Idle,
    Polling { started: Instant },
    Revealed(usize),
    Stalled,
    Exhausted,
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct Acquisition {
    pub trades: TradeSet,
    pub rounds: usize,
    pub stop: StopReason,
}

/// Drives a `CallSource` until the requested history is loaded.
pub struct AcquisitionController {
    parser: RecordParser,
    max_rounds: usize,
    reveal_timeout: Duration,
    settle_timeout: Duration,
    poll_interval: Duration,
}

impl AcquisitionController {
    pub fn new(cfg: &Config) -> Self {
        Self {
            parser: RecordParser::new(cfg),
            max_rounds: cfg.max_rounds,
            reveal_timeout: cfg.reveal_timeout(),
            settle_timeout: cfg.settle_timeout(),
            poll_interval: cfg.poll_interval(),
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Open the caller's page and load it per `mode`. An empty final set is
    /// reported as `EmptyResult`.
    pub async fn fetch_caller(
        &self,
        source: &mut dyn CallSource,
        caller: &str,
        mode: AcquisitionMode,
        now: DateTime<Utc>,
    ) -> Result<Acquisition, AcquisitionError> {
        info!("Fetching {} for '{}'", mode, caller);

        if let Err(e) = source.navigate(caller).await {
            return Err(AcquisitionError::NavigationTimeout {
                caller: caller.to_string(),
                reason: format!("{:#}", e),
            });
        }

        let acquisition = self.acquire(source, mode, now).await?;
        if acquisition.trades.is_empty() {
            return Err(AcquisitionError::EmptyResult {
                caller: caller.to_string(),
            });
        }
        Ok(acquisition)
    }

    /// Load rounds until the stopping predicate fires, the source stops
    /// growing, or the round bound is reached. The source must already be
    /// on the caller's page.
    pub async fn acquire(
        &self,
        source: &mut dyn CallSource,
        mode: AcquisitionMode,
        now: DateTime<Utc>,
    ) -> Result<Acquisition, AcquisitionError> {
        let mut rounds = 0usize;

        let stop = loop {
            let blocks = source.materialized_blocks().await?;
            let trades = TradeSet::from_blocks(&self.parser, &blocks);
            debug!(
                "Round {}: {} blocks, {} trades",
                rounds,
                blocks.len(),
                trades.len()
            );

            if mode.is_satisfied(&trades, now) {
                break StopReason::Satisfied;
            }
            if rounds >= self.max_rounds {
                warn!("Stopped after {} rounds without satisfying {}", rounds, mode);
                break StopReason::RoundLimit;
            }

            match self.reveal(source, blocks.len(), !trades.is_empty()).await? {
                RevealState::Revealed(count) => {
                    debug!("Revealed {} -> {} blocks", blocks.len(), count);
                    rounds += 1;
                }
                RevealState::Stalled => break StopReason::Stalled,
                RevealState::TimedOut => break StopReason::TimedOut,
                _ => break StopReason::Exhausted,
            }
        };

        let blocks = source.materialized_blocks().await?;
        let loaded = TradeSet::from_blocks(&self.parser, &blocks);
        let loaded_count = loaded.len();
        let trades = mode.finalize(loaded, now);

        info!(
            "Loaded {} trades ({} kept) in {} rounds, stop: {}",
            loaded_count,
            trades.len(),
            rounds,
            stop
        );

        Ok(Acquisition {
            trades,
            rounds,
            stop,
        })
    }

    /// Run one reveal interaction to a terminal state. Before any trade has
    /// loaded, a missing or unusable control is an error rather than an end
    /// of data.
    async fn reveal(
        &self,
        source: &mut dyn CallSource,
        before: usize,
        have_trades: bool,
    ) -> Result<RevealState, AcquisitionError> {
        let mut state = RevealState::Idle;

        loop {
            state = match state {
                RevealState::Idle => {
                    match tokio::time::timeout(self.reveal_timeout, source.reveal_more()).await {
                        Ok(Ok(true)) => RevealState::Polling {
                            started: Instant::now(),
                        },
                        Ok(Ok(false)) if !have_trades => {
                            return Err(AcquisitionError::AffordanceUnavailable {
                                reason: "no 'load more' control on the page".to_string(),
                            });
                        }
                        Ok(Ok(false)) => RevealState::Exhausted,
                        Ok(Err(e)) if !have_trades => {
                            return Err(AcquisitionError::AffordanceUnavailable {
                                reason: format!("{:#}", e),
                            });
                        }
                        Ok(Err(e)) => {
                            warn!("Load more failed, keeping what is loaded: {:#}", e);
                            RevealState::Exhausted
                        }
                        Err(_) if !have_trades => {
                            return Err(AcquisitionError::AffordanceUnavailable {
                                reason: format!(
                                    "no response within {}ms",
                                    self.reveal_timeout.as_millis()
                                ),
                            });
                        }
                        Err(_) => RevealState::TimedOut,
                    }
                }
                RevealState::Polling { started } => {
                    let count = source.materialized_blocks().await?.len();
                    if count > before {
                        RevealState::Revealed(count)
                    } else if started.elapsed() >= self.settle_timeout {
                        RevealState::Stalled
                    } else {
                        tokio::time::sleep(self.poll_interval).await;
                        RevealState::Polling { started }
                    }
                }
                terminal => return Ok(terminal),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawBlock;
    use crate::source::SnapshotSource;
    use crate::test_helpers::{base_time, default_test_config, make_block};
    use chrono::Duration as ChronoDuration;

    fn hourly_blocks(n: usize) -> Vec<RawBlock> {
        (0..n)
            .map(|i| {
                let ts = base_time() - ChronoDuration::hours(i as i64);
                make_block(
                    &format!("T{}", i),
                    &ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                    "10K",
                    "25K",
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn call_count_stops_once_enough_loaded() {
        let ctl = AcquisitionController::new(&default_test_config());
        let mut src = SnapshotSource::new(hourly_blocks(100), 10);
        src.navigate("alice").await.unwrap();

        let acq = ctl
            .acquire(&mut src, AcquisitionMode::ByCallCount(25), base_time())
            .await
            .unwrap();
        assert_eq!(acq.stop, StopReason::Satisfied);
        assert_eq!(acq.rounds, 2);
        assert_eq!(acq.trades.len(), 25);
        assert_eq!(src.visible(), 30);
    }

    #[tokio::test]
    async fn day_window_stops_at_frontier_and_filters() {
        let ctl = AcquisitionController::new(&default_test_config());
        let mut src = SnapshotSource::new(hourly_blocks(200), 20);
        src.navigate("alice").await.unwrap();

        let acq = ctl
            .acquire(&mut src, AcquisitionMode::ByDayWindow(2), base_time())
            .await
            .unwrap();
        assert_eq!(acq.stop, StopReason::Satisfied);
        // 60 visible, hours 0..=48 fall inside the window
        assert_eq!(src.visible(), 60);
        assert_eq!(acq.trades.len(), 49);
    }

    #[tokio::test]
    async fn exhausted_source_returns_everything() {
        let ctl = AcquisitionController::new(&default_test_config());
        let mut src = SnapshotSource::new(hourly_blocks(15), 10);
        src.navigate("alice").await.unwrap();

        let acq = ctl
            .acquire(&mut src, AcquisitionMode::ByCallCount(50), base_time())
            .await
            .unwrap();
        assert_eq!(acq.stop, StopReason::Exhausted);
        assert_eq!(acq.trades.len(), 15);
    }

    #[tokio::test]
    async fn round_limit_bounds_the_loop() {
        let ctl = AcquisitionController::new(&default_test_config()).with_max_rounds(3);
        let mut src = SnapshotSource::new(hourly_blocks(100), 5);
        src.navigate("alice").await.unwrap();

        let acq = ctl
            .acquire(&mut src, AcquisitionMode::ByCallCount(100), base_time())
            .await
            .unwrap();
        assert_eq!(acq.stop, StopReason::RoundLimit);
        assert_eq!(acq.rounds, 3);
        assert_eq!(acq.trades.len(), 20);
    }

    #[tokio::test]
    async fn missing_control_before_any_trade_is_an_error() {
        let ctl = AcquisitionController::new(&default_test_config());
        let bad = RawBlock::from_text("junk\nmore junk\nstill junk\nnope");
        let mut src = SnapshotSource::new(vec![bad], 10);

        let err = ctl
            .fetch_caller(&mut src, "alice", AcquisitionMode::ByCallCount(5), base_time())
            .await
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::AffordanceUnavailable { .. }));
    }

    #[tokio::test]
    async fn window_with_only_stale_trades_is_empty_result() {
        let ctl = AcquisitionController::new(&default_test_config());
        let stale = (0..3)
            .map(|i| {
                let ts = base_time() - ChronoDuration::days(10 + i);
                make_block("OLD", &ts.format("%Y-%m-%d %H:%M:%S").to_string(), "1K", "2K")
            })
            .collect();
        let mut src = SnapshotSource::new(stale, 10);

        let err = ctl
            .fetch_caller(&mut src, "alice", AcquisitionMode::ByRecentWindow24h, base_time())
            .await
            .unwrap_err();
        assert!(err.is_empty_result());
    }

    #[tokio::test]
    async fn navigation_failure_is_surfaced() {
        let ctl = AcquisitionController::new(&default_test_config());
        let mut src = SnapshotSource::new(Vec::new(), 10);

        let err = ctl
            .fetch_caller(&mut src, "ghost", AcquisitionMode::ByRecentWindow24h, base_time())
            .await
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::NavigationTimeout { .. }));
    }

    #[test]
    fn stop_reason_display() {
        assert_eq!(StopReason::RoundLimit.to_string(), "round limit");
        assert_eq!(StopReason::TimedOut.to_string(), "timed out");
    }
}
