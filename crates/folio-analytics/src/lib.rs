//! # Folio Analytics
//!
//! The return-series analytics pipeline: frequency resampling, canonical
//! per-ticker series, risk-free rate aggregation, financial metrics, and
//! portfolio-level aggregation.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`resample`] | Daily → weekly/monthly/quarterly calendar resampling |
//! | [`provider`] | Fetch → resample → validate into canonical series |
//! | [`riskfree`] | Scalar `R_f` from the external benchmark-rate series |
//! | [`metrics`] | Annualized return/volatility/Sharpe, beta, alpha, correlation |
//! | [`portfolio`] | Weighted aggregates, quadratic-form volatility, drawdown, distribution |
//! | [`report`] | One-call orchestration into an [`AnalysisReport`] |
//! | [`stats`] | Descriptive-statistics primitives |
//!
//! Data flows strictly upward: store adapter → resampler → provider →
//! metrics engine → portfolio aggregator. Structural failures surface as
//! [`AnalyticsError`]; degenerate-but-valid numerics resolve to sentinel
//! values with notices attached to the result.

pub mod error;
pub mod metrics;
pub mod portfolio;
pub mod provider;
pub mod report;
pub mod resample;
pub mod riskfree;
pub mod stats;

pub use error::AnalyticsError;
pub use metrics::{AnalysisConfig, CorrelationMatrix, MetricsEngine};
pub use portfolio::{
    daily_weighted_returns, distribution_stats, drawdown_stats, portfolio_volatility,
    treynor_ratio, true_sharpe, weighted_metric, weighted_return, DistributionStats, DrawdownStats,
};
pub use provider::SeriesProvider;
pub use report::{AnalysisReport, Analyzer, PortfolioSummary, TickerTables};
pub use riskfree::RiskFreeProvider;
