//! Risk-free rate provider.
//!
//! Collapses the external benchmark-rate series to the single scalar `R_f`
//! consumed by Sharpe and Treynor: filter to the analysis range, average
//! within each frequency period, then average the periodic values.

use folio_core::{DateRange, Frequency};
use folio_store::{RateFileSource, RateObservation};

use crate::error::AnalyticsError;
use crate::resample::period_key;

pub struct RiskFreeProvider {
    source: RateFileSource,
}

impl RiskFreeProvider {
    pub fn new(source: RateFileSource) -> Self {
        Self { source }
    }

    /// Scalar risk-free rate over the range at the requested frequency.
    ///
    /// # Errors
    ///
    /// [`AnalyticsError::NoRateData`] when the filtered range is empty.
    /// Callers are expected to treat this as recoverable and substitute
    /// zero with a notice rather than aborting the analysis.
    pub fn annualized_rate(
        &self,
        range: &DateRange,
        frequency: Frequency,
    ) -> Result<f64, AnalyticsError> {
        let rates = self.source.load()?;
        let in_range: Vec<RateObservation> = rates
            .into_iter()
            .filter(|obs| range.contains(obs.date))
            .collect();

        if in_range.is_empty() {
            return Err(AnalyticsError::NoRateData {
                start: range.start(),
                end: range.end(),
            });
        }

        let periodic = period_means(&in_range, frequency);
        let rate = periodic.iter().sum::<f64>() / periodic.len() as f64;

        tracing::debug!(
            frequency = %frequency,
            periods = periodic.len(),
            rate,
            "resolved risk-free rate"
        );
        Ok(rate)
    }
}

/// Average rate within each calendar period; daily passes through.
fn period_means(rates: &[RateObservation], frequency: Frequency) -> Vec<f64> {
    if frequency == Frequency::Daily {
        return rates.iter().map(|obs| obs.rate).collect();
    }

    let mut means = Vec::new();
    let mut bucket: Vec<f64> = Vec::new();
    let mut current = None;

    for obs in rates {
        let key = period_key(obs.date, frequency);
        if current.is_some() && current != Some(key) {
            means.push(bucket.iter().sum::<f64>() / bucket.len() as f64);
            bucket.clear();
        }
        current = Some(key);
        bucket.push(obs.rate);
    }
    if !bucket.is_empty() {
        means.push(bucket.iter().sum::<f64>() / bucket.len() as f64);
    }

    means
}
