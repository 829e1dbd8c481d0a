//! Canonical per-ticker series: fetch → resample → validate.

use folio_core::{Computed, DateRange, Frequency, Notice, ReturnSeries, Ticker};
use folio_store::{FieldKind, Observation, ReturnStore};

use crate::error::AnalyticsError;
use crate::resample;
use crate::stats;

/// Produces the canonical return series consumed by every downstream
/// metric.
pub struct SeriesProvider<'a> {
    store: &'a dyn ReturnStore,
}

impl<'a> SeriesProvider<'a> {
    pub fn new(store: &'a dyn ReturnStore) -> Self {
        Self { store }
    }

    /// Periodic returns for one ticker at the requested frequency.
    ///
    /// Non-finite observations are dropped before resampling; an empty
    /// result afterwards fails with [`AnalyticsError::EmptySeries`]. An
    /// all-zero series of length > 1 is flagged with a notice, since its
    /// zero volatility must be special-cased downstream.
    pub fn returns(
        &self,
        ticker: &Ticker,
        range: &DateRange,
        frequency: Frequency,
    ) -> Result<Computed<ReturnSeries>, AnalyticsError> {
        let raw = self.store.observations(ticker, range, FieldKind::Return1d)?;
        let cleaned: Vec<Observation> = raw.into_iter().filter(|o| o.value.is_finite()).collect();
        if cleaned.is_empty() {
            return Err(AnalyticsError::EmptySeries {
                ticker: ticker.clone(),
            });
        }

        let periodic = resample::resample_returns(&cleaned, frequency);
        let series = ReturnSeries::new(periodic.into_iter().map(|o| (o.date, o.value)).collect())?;

        let mut computed = Computed::clean(series);
        if is_degenerate(&computed.value) {
            computed.push(Notice::new(
                "series.zero_volatility",
                format!("returns for {ticker} are all zero; volatility is 0"),
            ));
        }

        tracing::debug!(
            ticker = %ticker,
            frequency = %frequency,
            periods = computed.value.len(),
            "built return series"
        );
        Ok(computed)
    }

    /// Periodic prices for one ticker (last observation in each period).
    pub fn prices(
        &self,
        ticker: &Ticker,
        range: &DateRange,
        frequency: Frequency,
    ) -> Result<Vec<Observation>, AnalyticsError> {
        let raw = self.store.observations(ticker, range, FieldKind::Close)?;
        let cleaned: Vec<Observation> = raw.into_iter().filter(|o| o.value.is_finite()).collect();
        if cleaned.is_empty() {
            return Err(AnalyticsError::EmptySeries {
                ticker: ticker.clone(),
            });
        }

        Ok(resample::resample_prices(&cleaned, frequency))
    }
}

fn is_degenerate(series: &ReturnSeries) -> bool {
    if series.len() < 2 {
        return false;
    }
    let mean = stats::mean(series.values());
    let stdev = stats::sample_stdev(series.values());
    matches!((mean, stdev), (Some(m), Some(s)) if m == 0.0 && s == 0.0)
}
