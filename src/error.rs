use thiserror::Error;

/// Why a shorthand magnitude ("5.6K", "3.2M") could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MagnitudeError {
    #[error("empty magnitude")]
    Empty,

    #[error("invalid magnitude '{0}'")]
    Invalid(String),
}

/// A record block that cannot become a `Trade`. Always recovered locally by
/// skipping the block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("record has {lines} lines, need at least 4")]
    TooShort { lines: usize },

    #[error("record is missing the '{0}' marker")]
    MissingMarker(&'static str),

    #[error("no value follows the '{0}' marker")]
    MissingValue(&'static str),

    #[error("unparsable timestamp '{0}'")]
    BadTimestamp(String),

    #[error("bad '{field}' value: {source}")]
    BadMagnitude {
        field: &'static str,
        #[source]
        source: MagnitudeError,
    },
}

/// Failures that end an acquisition run.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("page for '{caller}' never became ready: {reason}")]
    NavigationTimeout { caller: String, reason: String },

    #[error("'load more' control unavailable before any trades loaded: {reason}")]
    AffordanceUnavailable { reason: String },

    #[error("no trades found for '{caller}'")]
    EmptyResult { caller: String },

    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

impl AcquisitionError {
    /// "No data" is an outcome, not a hard failure.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, AcquisitionError::EmptyResult { .. })
    }
}
