//! Financial metrics engine: annualized return/volatility/Sharpe, CAPM
//! beta and alpha, and the cross-ticker correlation matrix.

use std::collections::BTreeMap;
use std::slice;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use folio_core::{Computed, DateRange, Frequency, Notice, ReturnSeries, Ticker};
use folio_store::ReturnStore;

use crate::error::AnalyticsError;
use crate::provider::SeriesProvider;
use crate::riskfree::RiskFreeProvider;
use crate::stats;

/// Shared configuration for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub range: DateRange,
    pub frequency: Frequency,
    pub market_ticker: Ticker,
}

impl AnalysisConfig {
    pub fn new(range: DateRange, frequency: Frequency, market_ticker: Ticker) -> Self {
        Self {
            range,
            frequency,
            market_ticker,
        }
    }
}

/// Computes per-ticker metrics against one backing store.
#[derive(Clone, Copy)]
pub struct MetricsEngine<'a> {
    store: &'a dyn ReturnStore,
    riskfree: Option<&'a RiskFreeProvider>,
}

impl<'a> MetricsEngine<'a> {
    pub fn new(store: &'a dyn ReturnStore, riskfree: Option<&'a RiskFreeProvider>) -> Self {
        Self { store, riskfree }
    }

    pub fn store(&self) -> &dyn ReturnStore {
        self.store
    }

    /// Canonical return series for one ticker at an arbitrary frequency.
    pub fn series(
        &self,
        ticker: &Ticker,
        range: &DateRange,
        frequency: Frequency,
    ) -> Result<Computed<ReturnSeries>, AnalyticsError> {
        SeriesProvider::new(self.store).returns(ticker, range, frequency)
    }

    /// Annualized cumulative return per ticker:
    /// `(1 + cumulative)^(1/years) − 1` with `years = n / periods_per_year`.
    pub fn annualized_returns(
        &self,
        tickers: &[Ticker],
        config: &AnalysisConfig,
    ) -> Result<Computed<BTreeMap<Ticker, f64>>, AnalyticsError> {
        let mut notices = Vec::new();
        let mut table = BTreeMap::new();

        for ticker in tickers {
            let series = self
                .series(ticker, &config.range, config.frequency)?
                .unwrap_into(&mut notices);
            table.insert(
                ticker.clone(),
                annualize(ticker, &series, config.frequency)?,
            );
        }

        Ok(Computed::with_notices(table, notices))
    }

    /// Annualized volatility per ticker: sample stdev × √periods_per_year.
    pub fn annualized_volatilities(
        &self,
        tickers: &[Ticker],
        config: &AnalysisConfig,
    ) -> Result<Computed<BTreeMap<Ticker, f64>>, AnalyticsError> {
        let stdevs = self.period_stdevs(tickers, config)?;
        let factor = (config.frequency.periods_per_year() as f64).sqrt();
        Ok(stdevs.map(|table| {
            table
                .into_iter()
                .map(|(ticker, stdev)| (ticker, stdev * factor))
                .collect()
        }))
    }

    /// Period-level (not annualized) sample stdev per ticker.
    pub fn period_stdevs(
        &self,
        tickers: &[Ticker],
        config: &AnalysisConfig,
    ) -> Result<Computed<BTreeMap<Ticker, f64>>, AnalyticsError> {
        let mut notices = Vec::new();
        let mut table = BTreeMap::new();

        for ticker in tickers {
            let series = self
                .series(ticker, &config.range, config.frequency)?
                .unwrap_into(&mut notices);
            let stdev = stats::sample_stdev(series.values()).ok_or(
                AnalyticsError::InsufficientData {
                    required: 2,
                    found: series.len(),
                },
            )?;
            table.insert(ticker.clone(), stdev);
        }

        Ok(Computed::with_notices(table, notices))
    }

    /// Annualized Sharpe ratio per ticker: `(R − R_f) / volatility`.
    ///
    /// Zero volatility resolves to `+∞` when the excess return is positive
    /// and `0` otherwise, with a notice either way.
    pub fn sharpe_ratios(
        &self,
        tickers: &[Ticker],
        config: &AnalysisConfig,
    ) -> Result<Computed<BTreeMap<Ticker, f64>>, AnalyticsError> {
        let mut notices = Vec::new();
        let risk_free = self.resolve_risk_free(config).unwrap_into(&mut notices);
        let returns = self
            .annualized_returns(tickers, config)?
            .unwrap_into(&mut notices);
        let volatilities = self
            .annualized_volatilities(tickers, config)?
            .unwrap_into(&mut notices);

        let mut table = BTreeMap::new();
        for (ticker, annual_return) in &returns {
            let Some(volatility) = volatilities.get(ticker) else {
                continue;
            };
            let sharpe = ratio_or_sentinel(
                annual_return - risk_free,
                *volatility,
                "sharpe.zero_volatility",
                &format!("volatility for {ticker}"),
                &mut notices,
            );
            table.insert(ticker.clone(), sharpe);
        }

        Ok(Computed::with_notices(table, notices))
    }

    /// Resolve `R_f`, substituting zero with a notice when the rate source
    /// is missing or fails. Never aborts the analysis.
    pub fn resolve_risk_free(&self, config: &AnalysisConfig) -> Computed<f64> {
        let Some(provider) = self.riskfree else {
            return Computed::with_notices(
                0.0,
                vec![Notice::new(
                    "riskfree.unavailable",
                    "no risk-free rate source configured; using R_f = 0",
                )],
            );
        };

        match provider.annualized_rate(&config.range, config.frequency) {
            Ok(rate) => Computed::clean(rate),
            Err(error) => Computed::with_notices(
                0.0,
                vec![Notice::new(
                    "riskfree.unavailable",
                    format!("could not resolve risk-free rate ({error}); using R_f = 0"),
                )],
            ),
        }
    }

    /// CAPM beta of one ticker against the configured market ticker:
    /// `cov(asset, market) / var(market)` over the inner-joined dates.
    pub fn beta(
        &self,
        ticker: &Ticker,
        config: &AnalysisConfig,
    ) -> Result<Computed<f64>, AnalyticsError> {
        let mut notices = Vec::new();
        let asset = self
            .series(ticker, &config.range, config.frequency)?
            .unwrap_into(&mut notices);
        let market = self
            .series(&config.market_ticker, &config.range, config.frequency)?
            .unwrap_into(&mut notices);

        let (asset_values, market_values) = align_pair(&asset, &market);
        if asset_values.is_empty() {
            return Err(AnalyticsError::NoOverlap {
                tickers: vec![ticker.clone(), config.market_ticker.clone()],
            });
        }
        if asset_values.len() < 2 {
            return Err(AnalyticsError::InsufficientData {
                required: 2,
                found: asset_values.len(),
            });
        }

        let covariance =
            stats::sample_covariance(&asset_values, &market_values).unwrap_or_default();
        let market_variance = stats::sample_variance(&market_values).unwrap_or_default();

        let beta = if market_variance == 0.0 {
            notices.push(Notice::new(
                "beta.zero_market_variance",
                format!(
                    "market variance is zero for {}; beta set to 0",
                    config.market_ticker
                ),
            ));
            0.0
        } else {
            covariance / market_variance
        };

        Ok(Computed::with_notices(beta, notices))
    }

    /// CAPM alpha: `R_asset − [R_f + β (R_market − R_f)]`, reusing the
    /// annualized-return and beta computations.
    pub fn alpha(
        &self,
        ticker: &Ticker,
        config: &AnalysisConfig,
    ) -> Result<Computed<f64>, AnalyticsError> {
        let mut notices = Vec::new();
        let risk_free = self.resolve_risk_free(config).unwrap_into(&mut notices);
        let beta = self.beta(ticker, config)?.unwrap_into(&mut notices);

        let asset_return = self
            .annualized_returns(slice::from_ref(ticker), config)?
            .unwrap_into(&mut notices)
            .remove(ticker)
            .unwrap_or_default();
        let market_return = self
            .annualized_returns(slice::from_ref(&config.market_ticker), config)?
            .unwrap_into(&mut notices)
            .remove(&config.market_ticker)
            .unwrap_or_default();

        let required_return = risk_free + beta * (market_return - risk_free);
        Ok(Computed::with_notices(asset_return - required_return, notices))
    }

    /// Full symmetric correlation matrix over the tickers' common dates.
    pub fn correlation_matrix(
        &self,
        tickers: &[Ticker],
        config: &AnalysisConfig,
    ) -> Result<Computed<CorrelationMatrix>, AnalyticsError> {
        let mut notices = Vec::new();

        let mut unique: Vec<Ticker> = Vec::new();
        for ticker in tickers {
            if !unique.contains(ticker) {
                unique.push(ticker.clone());
            }
        }

        let mut series = Vec::with_capacity(unique.len());
        for ticker in &unique {
            series.push(
                self.series(ticker, &config.range, config.frequency)?
                    .unwrap_into(&mut notices),
            );
        }

        let aligned = align_many(&series).ok_or_else(|| AnalyticsError::NoOverlap {
            tickers: unique.clone(),
        })?;

        let n = unique.len();
        let mut values = vec![vec![0.0; n]; n];
        for i in 0..n {
            values[i][i] = 1.0;
            for j in (i + 1)..n {
                let rho = match stats::pearson_correlation(&aligned[i], &aligned[j]) {
                    Some(rho) => rho,
                    None => {
                        notices.push(Notice::new(
                            "correlation.zero_variance",
                            format!(
                                "correlation between {} and {} is undefined; reported as 0",
                                unique[i], unique[j]
                            ),
                        ));
                        0.0
                    }
                };
                values[i][j] = rho;
                values[j][i] = rho;
            }
        }

        Ok(Computed::with_notices(
            CorrelationMatrix {
                tickers: unique,
                values,
            },
            notices,
        ))
    }
}

/// Symmetric pairwise-correlation table indexed by ticker on both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    tickers: Vec<Ticker>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn get(&self, a: &Ticker, b: &Ticker) -> Option<f64> {
        let i = self.tickers.iter().position(|t| t == a)?;
        let j = self.tickers.iter().position(|t| t == b)?;
        Some(self.values[i][j])
    }
}

impl Serialize for CorrelationMatrix {
    /// Nested map keyed by ticker on both axes.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut outer = serializer.serialize_map(Some(self.tickers.len()))?;
        for (i, row_ticker) in self.tickers.iter().enumerate() {
            let row: BTreeMap<&str, f64> = self
                .tickers
                .iter()
                .enumerate()
                .map(|(j, column_ticker)| (column_ticker.as_str(), self.values[i][j]))
                .collect();
            outer.serialize_entry(row_ticker.as_str(), &row)?;
        }
        outer.end()
    }
}

/// Divide excess by a denominator, resolving a zero denominator to the
/// sentinel policy: `+∞` when the excess is positive, `0` otherwise, with
/// a notice in both cases.
pub(crate) fn ratio_or_sentinel(
    excess: f64,
    denominator: f64,
    code: &str,
    what: &str,
    notices: &mut Vec<Notice>,
) -> f64 {
    if denominator == 0.0 {
        let value = if excess > 0.0 { f64::INFINITY } else { 0.0 };
        notices.push(Notice::new(
            code,
            format!("{what} is zero; ratio set to {value}"),
        ));
        return value;
    }
    excess / denominator
}

/// Inner join of two series on date.
fn align_pair(a: &ReturnSeries, b: &ReturnSeries) -> (Vec<f64>, Vec<f64>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (date, value) in a.iter() {
        if let Some(other) = b.value_at(date) {
            left.push(value);
            right.push(other);
        }
    }
    (left, right)
}

/// Inner join of many series on date; `None` when the intersection is
/// empty (or no series were given).
fn align_many(series: &[ReturnSeries]) -> Option<Vec<Vec<f64>>> {
    let first = series.first()?;

    let common: Vec<_> = first
        .dates()
        .iter()
        .copied()
        .filter(|date| series[1..].iter().all(|s| s.value_at(*date).is_some()))
        .collect();
    if common.is_empty() {
        return None;
    }

    Some(
        series
            .iter()
            .map(|s| {
                common
                    .iter()
                    .map(|date| s.value_at(*date).expect("date is in the intersection"))
                    .collect()
            })
            .collect(),
    )
}

/// Annualize one series over its own observation count.
fn annualize(
    ticker: &Ticker,
    series: &ReturnSeries,
    frequency: Frequency,
) -> Result<f64, AnalyticsError> {
    let years = series.len() as f64 / frequency.periods_per_year() as f64;
    if years == 0.0 {
        return Err(AnalyticsError::ZeroYears {
            ticker: ticker.clone(),
        });
    }
    let cumulative = series.cumulative_return();
    Ok((1.0 + cumulative).powf(1.0 / years) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::TradeDate;

    fn series(points: &[(&str, f64)]) -> ReturnSeries {
        ReturnSeries::new(
            points
                .iter()
                .map(|(date, value)| (TradeDate::parse(date).unwrap(), *value))
                .collect(),
        )
        .expect("test series must build")
    }

    #[test]
    fn align_pair_inner_joins_on_dates() {
        let a = series(&[("2024-01-02", 0.01), ("2024-01-03", 0.02), ("2024-01-04", 0.03)]);
        let b = series(&[("2024-01-03", 0.10), ("2024-01-04", 0.20), ("2024-01-05", 0.30)]);

        let (left, right) = align_pair(&a, &b);
        assert_eq!(left, vec![0.02, 0.03]);
        assert_eq!(right, vec![0.10, 0.20]);
    }

    #[test]
    fn align_many_rejects_empty_intersection() {
        let a = series(&[("2024-01-02", 0.01)]);
        let b = series(&[("2024-01-03", 0.02)]);
        assert!(align_many(&[a, b]).is_none());
    }

    #[test]
    fn zero_denominator_with_positive_excess_is_infinite() {
        let mut notices = Vec::new();
        let value = ratio_or_sentinel(0.05, 0.0, "test.zero", "volatility", &mut notices);
        assert!(value.is_infinite() && value.is_sign_positive());
        assert_eq!(notices.len(), 1);
    }

    #[test]
    fn zero_denominator_with_negative_excess_is_zero() {
        let mut notices = Vec::new();
        let value = ratio_or_sentinel(-0.05, 0.0, "test.zero", "volatility", &mut notices);
        assert_eq!(value, 0.0);
        assert_eq!(notices.len(), 1);
    }
}
