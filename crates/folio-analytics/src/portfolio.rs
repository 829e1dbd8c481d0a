//! Portfolio-level aggregation over per-ticker metrics tables and daily
//! return series.

use std::collections::BTreeMap;

use serde::Serialize;

use folio_core::{Computed, Frequency, Notice, Portfolio, ReturnSeries, Ticker};

use crate::error::AnalyticsError;
use crate::metrics::{ratio_or_sentinel, CorrelationMatrix};
use crate::stats;

/// Weighted sum of a per-ticker metric: `Σ wᵢ · metricᵢ`.
///
/// Tickers absent from the table are skipped with a notice, never
/// silently zero-filled.
pub fn weighted_metric(
    portfolio: &Portfolio,
    table: &BTreeMap<Ticker, f64>,
    label: &str,
) -> Computed<f64> {
    let mut notices = Vec::new();
    let mut total = 0.0;

    for (ticker, weight) in portfolio.holdings() {
        match table.get(ticker) {
            Some(value) => total += weight * value,
            None => notices.push(Notice::new(
                "portfolio.missing_ticker",
                format!("ticker {ticker} not present in {label} table; skipped"),
            )),
        }
    }

    Computed::with_notices(total, notices)
}

/// Portfolio return: `Σ wᵢ · rᵢ` over the annualized-return table.
pub fn weighted_return(portfolio: &Portfolio, returns: &BTreeMap<Ticker, f64>) -> Computed<f64> {
    weighted_metric(portfolio, returns, "return")
}

/// Portfolio volatility via the full covariance quadratic form:
/// `Σᵢ Σⱼ wᵢ wⱼ σᵢ σⱼ ρᵢⱼ`, with period-level stdevs and the correlation
/// matrix, annualized by `√periods_per_year` when requested.
pub fn portfolio_volatility(
    portfolio: &Portfolio,
    period_stdevs: &BTreeMap<Ticker, f64>,
    correlations: &CorrelationMatrix,
    annualize: bool,
    frequency: Frequency,
) -> Computed<f64> {
    let mut notices = Vec::new();

    for ticker in portfolio.holdings().keys() {
        if !period_stdevs.contains_key(ticker) {
            notices.push(Notice::new(
                "portfolio.missing_ticker",
                format!("ticker {ticker} not present in volatility inputs; skipped"),
            ));
        }
    }

    let mut variance = 0.0;
    for (ticker_i, weight_i) in portfolio.holdings() {
        for (ticker_j, weight_j) in portfolio.holdings() {
            let (Some(stdev_i), Some(stdev_j)) =
                (period_stdevs.get(ticker_i), period_stdevs.get(ticker_j))
            else {
                continue;
            };
            let Some(rho) = correlations.get(ticker_i, ticker_j) else {
                continue;
            };
            variance += weight_i * weight_j * stdev_i * stdev_j * rho;
        }
    }

    // The quadratic form is non-negative up to float noise.
    let mut volatility = variance.max(0.0).sqrt();
    if annualize {
        volatility *= (frequency.periods_per_year() as f64).sqrt();
    }

    Computed::with_notices(volatility, notices)
}

/// True portfolio Sharpe: `(R_p − R_f) / volatility_p`.
pub fn true_sharpe(portfolio_return: f64, risk_free: f64, volatility: f64) -> Computed<f64> {
    let mut notices = Vec::new();
    let value = ratio_or_sentinel(
        portfolio_return - risk_free,
        volatility,
        "portfolio.zero_volatility",
        "portfolio volatility",
        &mut notices,
    );
    Computed::with_notices(value, notices)
}

/// Treynor ratio: `(R_p − R_f) / β_p`.
pub fn treynor_ratio(portfolio_return: f64, risk_free: f64, beta: f64) -> Computed<f64> {
    let mut notices = Vec::new();
    let value = ratio_or_sentinel(
        portfolio_return - risk_free,
        beta,
        "portfolio.zero_beta",
        "portfolio beta",
        &mut notices,
    );
    Computed::with_notices(value, notices)
}

/// Weighted daily portfolio return series: `Σ wᵢ · rᵢ(t)` over the dates
/// shared by every available holding. Holdings with no daily series are
/// skipped with a notice.
pub fn daily_weighted_returns(
    portfolio: &Portfolio,
    daily: &BTreeMap<Ticker, ReturnSeries>,
) -> Result<Computed<ReturnSeries>, AnalyticsError> {
    let mut notices = Vec::new();
    let mut members: Vec<(f64, &ReturnSeries)> = Vec::new();

    for (ticker, weight) in portfolio.holdings() {
        match daily.get(ticker) {
            Some(series) => members.push((*weight, series)),
            None => notices.push(Notice::new(
                "portfolio.missing_ticker",
                format!("ticker {ticker} has no daily series; skipped"),
            )),
        }
    }

    let Some((_, first)) = members.first() else {
        return Err(AnalyticsError::NoOverlap {
            tickers: portfolio.tickers(),
        });
    };

    let mut points = Vec::new();
    for (date, _) in first.iter() {
        let mut weighted = 0.0;
        let mut complete = true;
        for (weight, series) in &members {
            match series.value_at(date) {
                Some(value) => weighted += weight * value,
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if complete {
            points.push((date, weighted));
        }
    }

    if points.is_empty() {
        return Err(AnalyticsError::NoOverlap {
            tickers: portfolio.tickers(),
        });
    }

    Ok(Computed::with_notices(ReturnSeries::new(points)?, notices))
}

/// Drawdown statistics over a daily return series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawdownStats {
    /// Deepest drawdown over the window (a non-positive fraction).
    pub max_drawdown: f64,
    /// Final drawdown: percent below the high-water mark at window end.
    pub pct_from_high_water: f64,
}

/// Running cumulative product vs. running maximum:
/// `drawdown = (cum − running_max) / running_max`.
pub fn drawdown_stats(daily: &ReturnSeries) -> DrawdownStats {
    let mut cumulative = 1.0;
    let mut running_max = 1.0;
    let mut max_drawdown = 0.0_f64;
    let mut last_drawdown = 0.0_f64;

    for value in daily.values() {
        cumulative *= 1.0 + value;
        running_max = running_max.max(cumulative);
        last_drawdown = (cumulative - running_max) / running_max;
        max_drawdown = max_drawdown.min(last_drawdown);
    }

    DrawdownStats {
        max_drawdown,
        pct_from_high_water: last_drawdown,
    }
}

/// Distribution shape of a daily return series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionStats {
    /// Fraction of strictly positive days.
    pub positive_share: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
    pub stdev: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

/// Distribution statistics; `None` for an empty series.
pub fn distribution_stats(daily: &ReturnSeries) -> Option<DistributionStats> {
    let values = daily.values();
    if values.is_empty() {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(DistributionStats {
        positive_share: stats::fraction_positive(values)?,
        min,
        q25: stats::quantile(values, 0.25)?,
        median: stats::median(values)?,
        q75: stats::quantile(values, 0.75)?,
        max,
        stdev: stats::sample_stdev(values),
        skewness: stats::skewness(values),
        kurtosis: stats::excess_kurtosis(values),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::TradeDate;

    fn ticker(s: &str) -> Ticker {
        Ticker::parse(s).expect("test ticker must parse")
    }

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
    fn missing_ticker_is_skipped_with_notice() {
        let portfolio = Portfolio::new(
            "p",
            BTreeMap::from([(ticker("AAPL"), 0.5), (ticker("MSFT"), 0.5)]),
        )
        .expect("must build");

        let table = BTreeMap::from([(ticker("AAPL"), 0.10)]);
        let computed = weighted_return(&portfolio, &table);

        assert!((computed.value - 0.05).abs() < 1e-12);
        assert_eq!(computed.notices.len(), 1);
        assert_eq!(computed.notices[0].code, "portfolio.missing_ticker");
    }

    #[test]
    fn monotone_rising_curve_has_zero_drawdown() {
        let daily = series(&[
            ("2024-01-02", 0.01),
            ("2024-01-03", 0.005),
            ("2024-01-04", 0.02),
        ]);
        let stats = drawdown_stats(&daily);
        assert_eq!(stats.max_drawdown, 0.0);
        assert_eq!(stats.pct_from_high_water, 0.0);
    }

    #[test]
    fn drawdown_tracks_running_maximum() {
        let daily = series(&[
            ("2024-01-02", 0.10),
            ("2024-01-03", -0.50),
            ("2024-01-04", 0.10),
        ]);
        let stats = drawdown_stats(&daily);

        // Peak 1.1, trough 0.55: 50% drawdown; recovery to 0.605 leaves
        // the curve 45% below the high-water mark.
        assert!((stats.max_drawdown - (-0.5)).abs() < 1e-12);
        assert!((stats.pct_from_high_water - (-0.45)).abs() < 1e-12);
    }

    #[test]
    fn daily_weighted_returns_inner_join_dates() {
        let portfolio = Portfolio::new(
            "p",
            BTreeMap::from([(ticker("A"), 0.5), (ticker("B"), 0.5)]),
        )
        .expect("must build");

        let daily = BTreeMap::from([
            (
                ticker("A"),
                series(&[("2024-01-02", 0.02), ("2024-01-03", 0.04)]),
            ),
            (
                ticker("B"),
                series(&[("2024-01-03", 0.02), ("2024-01-04", 0.04)]),
            ),
        ]);

        let computed = daily_weighted_returns(&portfolio, &daily).expect("must compute");
        assert_eq!(computed.value.len(), 1);
        assert!((computed.value.values()[0] - 0.03).abs() < 1e-12);
    }

    #[test]
    fn disjoint_daily_series_fail_with_no_overlap() {
        let portfolio = Portfolio::new(
            "p",
            BTreeMap::from([(ticker("A"), 0.5), (ticker("B"), 0.5)]),
        )
        .expect("must build");

        let daily = BTreeMap::from([
            (ticker("A"), series(&[("2024-01-02", 0.02)])),
            (ticker("B"), series(&[("2024-01-03", 0.02)])),
        ]);

        let err = daily_weighted_returns(&portfolio, &daily).expect_err("must fail");
        assert!(matches!(err, AnalyticsError::NoOverlap { .. }));
    }
}
