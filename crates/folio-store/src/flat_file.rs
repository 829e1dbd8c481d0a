//! Flat-file backend: one `{TICKER}.csv` per ticker under an injected
//! data directory.

use std::path::{Path, PathBuf};

use folio_core::{DateRange, Ticker, TradeDate};

use crate::error::StoreError;
use crate::models::{FieldKind, Observation};
use crate::{ReturnStore, StoreKind};

const DATE_HEADER: &str = "Date";

/// Store adapter over per-ticker CSV files.
///
/// The data directory is an explicit constructor argument; there is no
/// process-wide default to mutate.
#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn ticker_path(&self, ticker: &Ticker) -> PathBuf {
        self.data_dir.join(format!("{ticker}.csv"))
    }
}

impl ReturnStore for CsvStore {
    fn kind(&self) -> StoreKind {
        StoreKind::FlatFile
    }

    fn observations(
        &self,
        ticker: &Ticker,
        range: &DateRange,
        field: FieldKind,
    ) -> Result<Vec<Observation>, StoreError> {
        let path = self.ticker_path(ticker);
        if !path.exists() {
            return Err(StoreError::DataNotFound {
                ticker: ticker.clone(),
            });
        }

        let source_name = path.display().to_string();
        let mut reader = csv::Reader::from_path(&path)?;

        let headers = reader.headers()?.clone();
        let date_index = find_column(&headers, DATE_HEADER, &source_name)?;
        let value_index = find_column(&headers, field.csv_header(), &source_name)?;

        let mut observations = Vec::new();
        for record in reader.records() {
            let record = record?;
            let raw_date = record.get(date_index).unwrap_or("").trim();
            let raw_value = record.get(value_index).unwrap_or("").trim();

            let date = TradeDate::parse(raw_date).map_err(|_| StoreError::InvalidRecord {
                source_name: source_name.clone(),
                detail: format!("unreadable date '{raw_date}'"),
            })?;
            if !range.contains(date) {
                continue;
            }

            // Blank cells are absent observations, not zeroes.
            if raw_value.is_empty() {
                continue;
            }
            let value: f64 = raw_value.parse().map_err(|_| StoreError::InvalidRecord {
                source_name: source_name.clone(),
                detail: format!("unreadable {} value '{raw_value}' on {date}", field),
            })?;

            observations.push(Observation { date, value });
        }

        if observations.is_empty() {
            return Err(StoreError::DataNotFound {
                ticker: ticker.clone(),
            });
        }

        // Files are expected ascending; sort to guarantee the contract.
        observations.sort_by_key(|obs| obs.date);

        tracing::debug!(
            ticker = %ticker,
            field = %field,
            rows = observations.len(),
            "fetched observations from flat-file store"
        );
        Ok(observations)
    }
}

fn find_column(
    headers: &csv::StringRecord,
    name: &str,
    source_name: &str,
) -> Result<usize, StoreError> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .ok_or_else(|| StoreError::InvalidRecord {
            source_name: source_name.to_owned(),
            detail: format!("missing column '{name}'"),
        })
}
