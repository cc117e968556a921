use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/121.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Content source
    pub caller_base_url: String,
    pub render_url: String,
    pub user_agent: String,
    pub snapshot_page_size: usize,

    // Acquisition loop
    pub max_rounds: usize,
    pub reveal_timeout_ms: u64,
    pub settle_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub navigate_timeout_secs: u64,

    // Parsing
    pub timezone: String,
    pub strict_magnitudes: bool,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            caller_base_url: env("CALLER_BASE_URL", "https://sectbot.com/caller"),
            render_url: env("RENDER_URL", "http://localhost:3000/render"),
            user_agent: env("USER_AGENT", DEFAULT_USER_AGENT),
            snapshot_page_size: env("SNAPSHOT_PAGE_SIZE", "20").parse().unwrap_or(20),
            max_rounds: env("MAX_ROUNDS", "30").parse().unwrap_or(30),
            reveal_timeout_ms: env("REVEAL_TIMEOUT_MS", "20000").parse().unwrap_or(20000),
            settle_timeout_ms: env("SETTLE_TIMEOUT_MS", "2000").parse().unwrap_or(2000),
            poll_interval_ms: env("POLL_INTERVAL_MS", "250").parse().unwrap_or(250),
            navigate_timeout_secs: env("NAVIGATE_TIMEOUT_SECS", "15").parse().unwrap_or(15),
            timezone: env("TIMEZONE", "UTC"),
            strict_magnitudes: env("STRICT_MAGNITUDES", "false").to_lowercase() == "true",
            log_level: env("LOG_LEVEL", "info"),
        }
    }

    /// Zone used for timestamps that carry no offset. Unknown names fall back to UTC.
    pub fn tz(&self) -> Tz {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!("Unknown timezone '{}', using UTC", self.timezone);
                Tz::UTC
            }
        }
    }

    pub fn reveal_timeout(&self) -> Duration {
        Duration::from_millis(self.reveal_timeout_ms)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn navigate_timeout(&self) -> Duration {
        Duration::from_secs(self.navigate_timeout_secs)
    }
}
