use thiserror::Error;

use folio_core::{Ticker, TradeDate, ValidationError};
use folio_store::StoreError;

/// Errors produced by the analytics pipeline.
///
/// Structural failures abort the specific computation. Degenerate-but-valid
/// numeric situations are not represented here; they resolve to sentinel
/// values with advisory notices instead.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Data was present but nothing survived validation.
    #[error("no valid return observations for ticker {ticker} in the requested range")]
    EmptySeries { ticker: Ticker },

    /// The observation count yields zero elapsed years.
    #[error("elapsed years is zero for ticker {ticker}; cannot annualize")]
    ZeroYears { ticker: Ticker },

    /// Series share no common dates after the inner join.
    #[error("no overlapping dates across {}", format_tickers(.tickers))]
    NoOverlap { tickers: Vec<Ticker> },

    #[error("need at least {required} overlapping observations, found {found}")]
    InsufficientData { required: usize, found: usize },

    /// The benchmark-rate source has no rows in the requested range.
    #[error("no benchmark rate data between {start} and {end}")]
    NoRateData { start: TradeDate, end: TradeDate },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

fn format_tickers(tickers: &[Ticker]) -> String {
    tickers
        .iter()
        .map(Ticker::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
