use chrono_tz::Tz;
use tracing::warn;

use crate::config::Config;
use crate::error::MalformedRecord;
use crate::models::{RawBlock, Trade};
use crate::parsing::magnitude::try_decode_magnitude;
use crate::parsing::timestamp::parse_timestamp;

pub const CALLED_MARKER: &str = "Called at";
pub const REACHED_MARKER: &str = "Reached";

const MIN_LINES: usize = 4;

/// Turns one record block into a `Trade`.
///
/// Layout: token on line 1, call time on line 2, then "Called at" and
/// "Reached" marker lines each followed by a shorthand magnitude.
#[derive(Debug, Clone)]
pub struct RecordParser {
    tz: Tz,
    strict_magnitudes: bool,
}

impl RecordParser {
    pub fn new(cfg: &Config) -> Self {
        Self {
            tz: cfg.tz(),
            strict_magnitudes: cfg.strict_magnitudes,
        }
    }

    pub fn with_options(tz: Tz, strict_magnitudes: bool) -> Self {
        Self {
            tz,
            strict_magnitudes,
        }
    }

    pub fn parse(&self, block: &RawBlock) -> Result<Trade, MalformedRecord> {
        let lines = block.lines();
        if lines.len() < MIN_LINES {
            return Err(MalformedRecord::TooShort { lines: lines.len() });
        }
        if !block.has_line(CALLED_MARKER) {
            return Err(MalformedRecord::MissingMarker(CALLED_MARKER));
        }
        if !block.has_line(REACHED_MARKER) {
            return Err(MalformedRecord::MissingMarker(REACHED_MARKER));
        }

        let called_text = block
            .value_after(CALLED_MARKER)
            .ok_or(MalformedRecord::MissingValue(CALLED_MARKER))?;
        let reached_text = block
            .value_after(REACHED_MARKER)
            .ok_or(MalformedRecord::MissingValue(REACHED_MARKER))?;

        let called = self.magnitude(CALLED_MARKER, called_text, &lines[0])?;
        let reached = self.magnitude(REACHED_MARKER, reached_text, &lines[0])?;

        let timestamp = parse_timestamp(&lines[1], self.tz)
            .ok_or_else(|| MalformedRecord::BadTimestamp(lines[1].clone()))?;

        Ok(Trade::new(lines[0].clone(), timestamp, called, reached))
    }

    fn magnitude(
        &self,
        field: &'static str,
        text: &str,
        token: &str,
    ) -> Result<f64, MalformedRecord> {
        match try_decode_magnitude(text) {
            Ok(v) => Ok(v),
            Err(source) if self.strict_magnitudes => {
                Err(MalformedRecord::BadMagnitude { field, source })
            }
            Err(e) => {
                warn!("{}: '{}' value degraded to 0 ({})", token, field, e);
                Ok(0.0)
            }
        }
    }
}
