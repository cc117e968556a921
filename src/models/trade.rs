use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::RawBlock;
use crate::parsing::RecordParser;

/// A call counts as a win once it reaches 2x.
pub const WIN_MULTIPLIER: f64 = 2.0;

/// One parsed trading call. Fields are fixed at construction so the
/// multiplier always agrees with the two prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    token: String,
    timestamp: DateTime<Utc>,
    called_price: f64,
    reached_price: f64,
    multiplier: f64,
}

impl Trade {
    pub fn new(
        token: impl Into<String>,
        timestamp: DateTime<Utc>,
        called_price: f64,
        reached_price: f64,
    ) -> Self {
        let multiplier = if called_price > 0.0 {
            reached_price / called_price
        } else {
            0.0
        };

        Self {
            token: token.into(),
            timestamp,
            called_price,
            reached_price,
            multiplier,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn called_price(&self) -> f64 {
        self.called_price
    }

    pub fn reached_price(&self) -> f64 {
        self.reached_price
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// True when the call reached `threshold` times its entry.
    pub fn hits(&self, threshold: f64) -> bool {
        self.multiplier >= threshold
    }

    pub fn is_win(&self) -> bool {
        self.hits(WIN_MULTIPLIER)
    }
}

/// Trades in source order (newest first, as the page lists them).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeSet {
    trades: Vec<Trade>,
}

impl TradeSet {
    pub fn new(trades: Vec<Trade>) -> Self {
        Self { trades }
    }

    /// Parse every block, keeping page order. Malformed blocks are skipped.
    pub fn from_blocks(parser: &RecordParser, blocks: &[RawBlock]) -> Self {
        let mut trades = Vec::with_capacity(blocks.len());
        for (idx, block) in blocks.iter().enumerate() {
            match parser.parse(block) {
                Ok(trade) => trades.push(trade),
                Err(e) => tracing::debug!("Skipping block {}: {}", idx, e),
            }
        }
        Self { trades }
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Trade> {
        self.trades.get(index)
    }

    /// Newest trade.
    pub fn first(&self) -> Option<&Trade> {
        self.trades.first()
    }

    /// Oldest trade loaded so far.
    pub fn frontier(&self) -> Option<&Trade> {
        self.trades.last()
    }

    /// The `n` newest trades.
    pub fn head(&self, n: usize) -> TradeSet {
        let end = n.min(self.trades.len());
        TradeSet::new(self.trades[..end].to_vec())
    }

    /// Trades at or after `ts`.
    pub fn since(&self, ts: DateTime<Utc>) -> TradeSet {
        let trades: Vec<Trade> = self
            .trades
            .iter()
            .filter(|t| t.timestamp >= ts)
            .cloned()
            .collect();
        TradeSet::new(trades)
    }

    pub fn multipliers(&self) -> Vec<f64> {
        self.trades.iter().map(|t| t.multiplier).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trade> {
        self.trades.iter()
    }

    pub fn as_slice(&self) -> &[Trade] {
        &self.trades
    }
}

impl std::ops::Index<usize> for TradeSet {
    type Output = Trade;
    fn index(&self, index: usize) -> &Self::Output {
        &self.trades[index]
    }
}

impl IntoIterator for TradeSet {
    type Item = Trade;
    type IntoIter = std::vec::IntoIter<Trade>;
    fn into_iter(self) -> Self::IntoIter {
        self.trades.into_iter()
    }
}

impl<'a> IntoIterator for &'a TradeSet {
    type Item = &'a Trade;
    type IntoIter = std::slice::Iter<'a, Trade>;
    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}

impl FromIterator<Trade> for TradeSet {
    fn from_iter<I: IntoIterator<Item = Trade>>(iter: I) -> Self {
        TradeSet::new(iter.into_iter().collect())
    }
}
