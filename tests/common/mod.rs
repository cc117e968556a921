use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use caller_stats::config::Config;
use caller_stats::models::RawBlock;
use caller_stats::source::CallSource;

/// How the fake "load more" control responds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Uncovers `step` more blocks each time.
    Grow,
    /// Claims success but nothing new appears.
    StuckTrue,
    /// Backend error.
    Fail,
    /// Never answers.
    Hang,
    /// Accepts the press, but the new blocks only show up on the n-th
    /// look afterwards.
    Lagged(usize),
}

/// A scripted caller page.
pub struct MockSource {
    pub blocks: Vec<RawBlock>,
    pub visible: usize,
    pub first_page: usize,
    pub step: usize,
    pub reveal: Reveal,
    pub reveal_calls: usize,
    pub materialize_calls: usize,
    pub navigate_fails: bool,
    pending: Option<(usize, usize)>,
}

impl MockSource {
    pub fn new(blocks: Vec<RawBlock>, first_page: usize, step: usize) -> Self {
        Self {
            blocks,
            visible: 0,
            first_page,
            step,
            reveal: Reveal::Grow,
            reveal_calls: 0,
            materialize_calls: 0,
            navigate_fails: false,
            pending: None,
        }
    }

    pub fn with_reveal(mut self, reveal: Reveal) -> Self {
        self.reveal = reveal;
        self
    }
}

#[async_trait]
impl CallSource for MockSource {
    async fn navigate(&mut self, _caller: &str) -> Result<()> {
        if self.navigate_fails {
            anyhow::bail!("timed out waiting for call-box");
        }
        self.visible = self.first_page.min(self.blocks.len());
        Ok(())
    }

    async fn materialized_blocks(&mut self) -> Result<Vec<RawBlock>> {
        self.materialize_calls += 1;
        if let Some((target, looks_left)) = self.pending.take() {
            if looks_left <= 1 {
                self.visible = target;
            } else {
                self.pending = Some((target, looks_left - 1));
            }
        }
        Ok(self.blocks[..self.visible].to_vec())
    }

    async fn reveal_more(&mut self) -> Result<bool> {
        self.reveal_calls += 1;
        match self.reveal {
            Reveal::Grow => {
                if self.visible >= self.blocks.len() {
                    return Ok(false);
                }
                self.visible = (self.visible + self.step).min(self.blocks.len());
                Ok(true)
            }
            Reveal::Lagged(looks) => {
                if self.visible >= self.blocks.len() {
                    return Ok(false);
                }
                let target = (self.visible + self.step).min(self.blocks.len());
                self.pending = Some((target, looks));
                Ok(true)
            }
            Reveal::StuckTrue => Ok(true),
            Reveal::Fail => anyhow::bail!("show more button not clickable"),
            Reveal::Hang => {
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                Ok(true)
            }
        }
    }
}

pub fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-17T13:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn block_at(token: &str, ts: DateTime<Utc>, called: &str, reached: &str) -> RawBlock {
    RawBlock::new(vec![
        token.to_string(),
        ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        "Called at".to_string(),
        called.to_string(),
        "Reached".to_string(),
        reached.to_string(),
    ])
}

/// `n` well-formed blocks, newest first, `spacing_hours` apart.
pub fn blocks(n: usize, spacing_hours: i64) -> Vec<RawBlock> {
    (0..n)
        .map(|i| {
            block_at(
                &format!("T{}", i),
                now() - Duration::hours(i as i64 * spacing_hours),
                "10K",
                "25K",
            )
        })
        .collect()
}

pub fn test_config() -> Config {
    let mut cfg = Config::from_env();
    cfg.timezone = "UTC".to_string();
    cfg.strict_magnitudes = false;
    cfg.max_rounds = 30;
    cfg.reveal_timeout_ms = 100;
    cfg.settle_timeout_ms = 40;
    cfg.poll_interval_ms = 5;
    cfg.snapshot_page_size = 10;
    cfg
}
