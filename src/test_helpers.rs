use chrono::{DateTime, Duration, Utc};

use crate::config::{Config, DEFAULT_USER_AGENT};
use crate::models::{RawBlock, Trade, TradeSet};

/// Fixed "now" used across tests.
pub fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// A record block in the page's layout.
pub fn make_block(token: &str, timestamp: &str, called: &str, reached: &str) -> RawBlock {
    RawBlock::new(vec![
        token.to_string(),
        timestamp.to_string(),
        "Called at".to_string(),
        called.to_string(),
        "Reached".to_string(),
        reached.to_string(),
    ])
}

/// Trades with the given multipliers, newest first, one hour apart from `base_time()`.
pub fn make_trades(multipliers: &[f64]) -> TradeSet {
    multipliers
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            Trade::new(
                format!("T{}", i),
                base_time() - Duration::hours(i as i64),
                1.0,
                m,
            )
        })
        .collect()
}

/// A Config with fast timeouts and no network dependencies.
pub fn default_test_config() -> Config {
    Config {
        caller_base_url: "http://127.0.0.1:9/caller".to_string(),
        render_url: "http://127.0.0.1:9/render".to_string(),
        user_agent: DEFAULT_USER_AGENT.to_string(),
        snapshot_page_size: 10,
        max_rounds: 30,
        reveal_timeout_ms: 200,
        settle_timeout_ms: 50,
        poll_interval_ms: 5,
        navigate_timeout_secs: 1,
        timezone: "UTC".to_string(),
        strict_magnitudes: false,
        log_level: "debug".to_string(),
    }
}
