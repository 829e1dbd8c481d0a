use thiserror::Error;

use folio_core::Ticker;

/// Errors produced by the store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No backend records for the ticker in the requested range. A required
    /// error, not a soft empty result: downstream calculations treat empty
    /// input as invalid analysis input.
    #[error("no records for ticker {ticker} in the requested range")]
    DataNotFound { ticker: Ticker },

    #[error("malformed record in {source_name}: {detail}")]
    InvalidRecord { source_name: String, detail: String },

    #[error(transparent)]
    Db(#[from] duckdb::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
