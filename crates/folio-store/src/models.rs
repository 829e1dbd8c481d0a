use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use folio_core::{Ticker, TradeDate};

/// Which value column a fetch should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Closing price.
    Close,
    /// One-period (daily) return, as a decimal fraction.
    Return1d,
}

impl FieldKind {
    /// Column name in the relational backend.
    pub const fn as_column(self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Return1d => "return_1d",
        }
    }

    /// Header name in the flat-file backend.
    pub const fn csv_header(self) -> &'static str {
        match self {
            Self::Close => "Close",
            Self::Return1d => "return_1d",
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_column())
    }
}

/// One raw (date, value) record as returned by a store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: TradeDate,
    pub value: f64,
}

/// One full row of the relational backend, used for ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesRow {
    pub ticker: Ticker,
    pub date: TradeDate,
    pub close: Option<f64>,
    pub return_1d: Option<f64>,
}

/// One periodic benchmark-rate record, already converted to a fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    pub date: TradeDate,
    pub rate: f64,
}
