use thiserror::Error;

/// Validation and contract errors exposed by `folio-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter: '{ch}'")]
    TickerInvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("unsupported frequency '{value}', expected one of daily/1d, weekly/1w, monthly/1m, quarterly/1q")]
    UnsupportedFrequency { value: String },

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("return series dates must be strictly ascending (violation at index {index})")]
    SeriesNotAscending { index: usize },
    #[error("return series values must be finite (violation at index {index})")]
    SeriesNotFinite { index: usize },

    #[error("weight for ticker {ticker} must be finite")]
    NonFiniteWeight { ticker: String },
    #[error("portfolio has no holdings")]
    EmptyHoldings,
    #[error("cannot normalize weights: total weight is zero")]
    ZeroTotalWeight,
    #[error("ticker {ticker} not found in portfolio")]
    HoldingNotFound { ticker: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
