//! Full-portfolio analysis: one call producing everything the
//! presentation layers consume.

use std::collections::BTreeMap;

use serde::Serialize;

use folio_core::{
    Computed, Frequency, Notice, Portfolio, ReturnSeries, SeriesPoint, Ticker, TradeDate,
    ValidationError,
};

use crate::error::AnalyticsError;
use crate::metrics::{AnalysisConfig, CorrelationMatrix, MetricsEngine};
use crate::portfolio::{
    daily_weighted_returns, distribution_stats, drawdown_stats, portfolio_volatility, treynor_ratio,
    true_sharpe, weighted_metric, weighted_return, DistributionStats,
};

/// Per-ticker metric tables, keyed by uppercased ticker.
///
/// Beta and alpha entries are `None` when that ticker's computation failed
/// against the market series; the failure is recorded as a notice instead
/// of aborting the whole analysis.
#[derive(Debug, Clone, Serialize)]
pub struct TickerTables {
    pub annualized_return: BTreeMap<Ticker, f64>,
    pub annualized_volatility: BTreeMap<Ticker, f64>,
    pub sharpe_ratio: BTreeMap<Ticker, f64>,
    pub beta: BTreeMap<Ticker, Option<f64>>,
    pub alpha: BTreeMap<Ticker, Option<f64>>,
}

/// Portfolio-level aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSummary {
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub beta: f64,
    pub alpha: f64,
    /// Weighted average of per-ticker Sharpe ratios (an approximation).
    pub naive_sharpe: f64,
    /// `(R_p − R_f) / volatility_p`.
    pub sharpe: f64,
    pub treynor: f64,
    pub max_drawdown: f64,
    pub pct_from_high_water: f64,
    pub distribution: DistributionStats,
}

/// The complete result of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub portfolio_name: String,
    pub start: TradeDate,
    pub end: TradeDate,
    pub frequency: Frequency,
    pub market_ticker: Ticker,
    pub risk_free_rate: f64,
    pub tickers: TickerTables,
    pub correlation: CorrelationMatrix,
    pub portfolio: PortfolioSummary,
    /// Daily weighted portfolio returns, for the charting consumer.
    pub daily_portfolio_returns: Vec<SeriesPoint>,
    /// Daily market benchmark returns, when available.
    pub daily_benchmark_returns: Option<Vec<SeriesPoint>>,
}

/// Runs the full pipeline for one portfolio.
pub struct Analyzer<'a> {
    engine: MetricsEngine<'a>,
}

impl<'a> Analyzer<'a> {
    pub fn new(engine: MetricsEngine<'a>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &MetricsEngine<'a> {
        &self.engine
    }

    /// Compute the complete report.
    ///
    /// Per-ticker fetches happen first; aggregate computations (correlation
    /// matrix, portfolio totals) only run once every per-ticker result is
    /// in. Structural failures on the frequency-level tables abort the
    /// run; per-ticker beta/alpha failures and a missing benchmark series
    /// degrade to notices.
    pub fn run(
        &self,
        portfolio: &Portfolio,
        config: &AnalysisConfig,
    ) -> Result<Computed<AnalysisReport>, AnalyticsError> {
        if portfolio.is_empty() {
            return Err(ValidationError::EmptyHoldings.into());
        }

        tracing::info!(
            portfolio = portfolio.name(),
            holdings = portfolio.len(),
            frequency = %config.frequency,
            range = %config.range,
            "running portfolio analysis"
        );

        let mut notices: Vec<Notice> = Vec::new();
        notices.extend(portfolio.weight_notice());

        let tickers = portfolio.tickers();

        // Frequency-level per-ticker tables.
        let returns = self
            .engine
            .annualized_returns(&tickers, config)?
            .unwrap_into(&mut notices);
        let volatilities = self
            .engine
            .annualized_volatilities(&tickers, config)?
            .unwrap_into(&mut notices);
        let sharpes = self
            .engine
            .sharpe_ratios(&tickers, config)?
            .unwrap_into(&mut notices);
        let period_stdevs = self
            .engine
            .period_stdevs(&tickers, config)?
            .unwrap_into(&mut notices);
        let correlation = self
            .engine
            .correlation_matrix(&tickers, config)?
            .unwrap_into(&mut notices);

        // Beta/alpha vs the market, tolerant per ticker.
        let mut betas: BTreeMap<Ticker, Option<f64>> = BTreeMap::new();
        let mut alphas: BTreeMap<Ticker, Option<f64>> = BTreeMap::new();
        for ticker in &tickers {
            betas.insert(
                ticker.clone(),
                self.tolerant_metric(ticker, "beta", &mut notices, |t| self.engine.beta(t, config)),
            );
            alphas.insert(
                ticker.clone(),
                self.tolerant_metric(ticker, "alpha", &mut notices, |t| {
                    self.engine.alpha(t, config)
                }),
            );
        }

        // Portfolio-level aggregates.
        let portfolio_return = weighted_return(portfolio, &returns).unwrap_into(&mut notices);
        let portfolio_vol =
            portfolio_volatility(portfolio, &period_stdevs, &correlation, true, config.frequency)
                .unwrap_into(&mut notices);
        let beta_table: BTreeMap<Ticker, f64> = betas
            .iter()
            .filter_map(|(t, b)| b.map(|value| (t.clone(), value)))
            .collect();
        let alpha_table: BTreeMap<Ticker, f64> = alphas
            .iter()
            .filter_map(|(t, a)| a.map(|value| (t.clone(), value)))
            .collect();
        let portfolio_beta = weighted_metric(portfolio, &beta_table, "beta").unwrap_into(&mut notices);
        let portfolio_alpha =
            weighted_metric(portfolio, &alpha_table, "alpha").unwrap_into(&mut notices);
        let naive_sharpe =
            weighted_metric(portfolio, &sharpes, "sharpe").unwrap_into(&mut notices);

        let risk_free_rate = self.engine.resolve_risk_free(config).unwrap_into(&mut notices);
        let sharpe =
            true_sharpe(portfolio_return, risk_free_rate, portfolio_vol).unwrap_into(&mut notices);
        let treynor =
            treynor_ratio(portfolio_return, risk_free_rate, portfolio_beta).unwrap_into(&mut notices);

        // Daily series: drawdown and distribution shape are always computed
        // on daily data, independent of the analysis frequency.
        let mut daily: BTreeMap<Ticker, ReturnSeries> = BTreeMap::new();
        for ticker in &tickers {
            let series = self
                .engine
                .series(ticker, &config.range, Frequency::Daily)?
                .unwrap_into(&mut notices);
            daily.insert(ticker.clone(), series);
        }
        let daily_series = daily_weighted_returns(portfolio, &daily)?.unwrap_into(&mut notices);

        let drawdown = drawdown_stats(&daily_series);
        let distribution =
            distribution_stats(&daily_series).expect("daily weighted series is non-empty");

        let daily_benchmark_returns =
            match self
                .engine
                .series(&config.market_ticker, &config.range, Frequency::Daily)
            {
                Ok(computed) => Some(computed.unwrap_into(&mut notices).into()),
                Err(error) => {
                    notices.push(Notice::new(
                        "benchmark.unavailable",
                        format!(
                            "no daily benchmark series for {}: {error}",
                            config.market_ticker
                        ),
                    ));
                    None
                }
            };

        let report = AnalysisReport {
            portfolio_name: portfolio.name().to_owned(),
            start: config.range.start(),
            end: config.range.end(),
            frequency: config.frequency,
            market_ticker: config.market_ticker.clone(),
            risk_free_rate,
            tickers: TickerTables {
                annualized_return: returns,
                annualized_volatility: volatilities,
                sharpe_ratio: sharpes,
                beta: betas,
                alpha: alphas,
            },
            correlation,
            portfolio: PortfolioSummary {
                annualized_return: portfolio_return,
                annualized_volatility: portfolio_vol,
                beta: portfolio_beta,
                alpha: portfolio_alpha,
                naive_sharpe,
                sharpe,
                treynor,
                max_drawdown: drawdown.max_drawdown,
                pct_from_high_water: drawdown.pct_from_high_water,
                distribution,
            },
            daily_portfolio_returns: daily_series.into(),
            daily_benchmark_returns,
        };

        tracing::info!(
            portfolio = report.portfolio_name.as_str(),
            notices = notices.len(),
            "portfolio analysis complete"
        );
        Ok(Computed::with_notices(report, notices))
    }

    fn tolerant_metric(
        &self,
        ticker: &Ticker,
        label: &str,
        notices: &mut Vec<Notice>,
        compute: impl FnOnce(&Ticker) -> Result<Computed<f64>, AnalyticsError>,
    ) -> Option<f64> {
        match compute(ticker) {
            Ok(computed) => Some(computed.unwrap_into(notices)),
            Err(error) => {
                notices.push(Notice::new(
                    format!("metrics.{label}_unavailable"),
                    format!("could not compute {label} for {ticker}: {error}"),
                ));
                None
            }
        }
    }
}
