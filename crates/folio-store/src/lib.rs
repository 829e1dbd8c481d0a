//! # Folio Store
//!
//! Store adapters for per-ticker observation series.
//!
//! Two interchangeable backends implement the [`ReturnStore`] contract:
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`CsvStore`] | One `{TICKER}.csv` file per ticker under an injected directory |
//! | [`TableStore`] | A single `DuckDB` `timeseries` table keyed by (ticker, date) |
//!
//! Both return records filtered to the inclusive date range in ascending
//! date order, and both fail with [`StoreError::DataNotFound`] when nothing
//! matches. The relational backend acquires a pooled connection per fetch
//! and releases it unconditionally on drop.
//!
//! [`RateFileSource`] loads the external benchmark-rate series consumed by
//! the risk-free rate provider.

pub mod duckdb;
pub mod error;
pub mod flat_file;
pub mod models;
pub mod rates;
pub mod table;

use std::fmt::{Display, Formatter};

use folio_core::{DateRange, Ticker};

pub use crate::duckdb::{ConnectionManager, PooledConnection};
pub use crate::error::StoreError;
pub use crate::flat_file::CsvStore;
pub use crate::models::{FieldKind, Observation, RateObservation, TimeseriesRow};
pub use crate::rates::RateFileSource;
pub use crate::table::{TableStore, TableStoreConfig};

/// Which backend a store adapter reads from, selected by caller policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    FlatFile,
    Table,
}

impl StoreKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FlatFile => "csv",
            Self::Table => "table",
        }
    }
}

impl Display for StoreKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform read contract over the backing stores.
pub trait ReturnStore: Send + Sync {
    fn kind(&self) -> StoreKind;

    /// Raw observation records for one ticker, filtered to the inclusive
    /// range, ascending by date.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataNotFound`] when the backend holds no
    /// matching records (missing file, or zero matching rows).
    fn observations(
        &self,
        ticker: &Ticker,
        range: &DateRange,
        field: FieldKind,
    ) -> Result<Vec<Observation>, StoreError>;
}
