//! Benchmark-rate file source.
//!
//! The external rate file carries a `MM/DD/YYYY` date column and a
//! percentage column (`Rate (%)`) whose values keep their percent sign.

use std::path::{Path, PathBuf};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

use folio_core::TradeDate;

use crate::error::StoreError;
use crate::models::RateObservation;

const RATE_DATE: &[FormatItem<'_>] =
    format_description!("[month padding:none]/[day padding:none]/[year]");

const DATE_HEADER: &str = "Date";
const RATE_HEADER: &str = "Rate (%)";

/// Loader for the external benchmark-rate series.
#[derive(Debug, Clone)]
pub struct RateFileSource {
    path: PathBuf,
}

impl RateFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full rate series, dropping rows that fail to parse.
    ///
    /// Percent values are stripped of their `%` sign and divided by 100 so
    /// the result is a decimal fraction like every other rate in the
    /// pipeline.
    pub fn load(&self) -> Result<Vec<RateObservation>, StoreError> {
        let source_name = self.path.display().to_string();
        let mut reader = csv::Reader::from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        let date_index = position(&headers, DATE_HEADER, &source_name)?;
        let rate_index = position(&headers, RATE_HEADER, &source_name)?;

        let mut rates = Vec::new();
        for record in reader.records() {
            let record = record?;
            let raw_date = record.get(date_index).unwrap_or("").trim();
            let raw_rate = record.get(rate_index).unwrap_or("").trim();

            let Ok(date) = Date::parse(raw_date, RATE_DATE) else {
                continue;
            };
            let Ok(percent) = raw_rate.trim_end_matches('%').trim().parse::<f64>() else {
                continue;
            };

            rates.push(RateObservation {
                date: TradeDate::from_date(date),
                rate: percent / 100.0,
            });
        }

        rates.sort_by_key(|obs| obs.date);

        tracing::debug!(rows = rates.len(), path = %source_name, "loaded benchmark rate series");
        Ok(rates)
    }
}

fn position(
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
