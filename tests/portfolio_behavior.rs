//! Behavior tests for portfolio aggregation and the full analysis run.

use std::collections::BTreeMap;

use folio_analytics::{
    portfolio_volatility, AnalysisConfig, Analyzer, MetricsEngine, RiskFreeProvider,
};
use folio_core::{Frequency, Portfolio};
use folio_store::{CsvStore, RateFileSource};
use folio_tests::{range, ticker, write_rates_csv, write_ticker_csv};
use tempfile::tempdir;

fn config(start: &str, end: &str, frequency: Frequency) -> AnalysisConfig {
    AnalysisConfig::new(range(start, end), frequency, ticker("SPY"))
}

const MARKET_ROWS: [(&str, f64, Option<f64>); 4] = [
    ("2024-01-02", 470.0, Some(0.012)),
    ("2024-01-03", 468.0, Some(-0.004)),
    ("2024-01-04", 474.0, Some(0.013)),
    ("2024-01-05", 471.0, Some(-0.006)),
];

#[test]
fn identical_holdings_collapse_portfolio_volatility_to_the_single_ticker_case() {
    let temp = tempdir().expect("tempdir");
    let rows = [
        ("2024-01-02", 100.0, Some(0.01)),
        ("2024-01-03", 98.0, Some(-0.02)),
        ("2024-01-04", 99.5, Some(0.015)),
        ("2024-01-05", 100.2, Some(0.007)),
    ];
    write_ticker_csv(temp.path(), "A", &rows);
    write_ticker_csv(temp.path(), "B", &rows);
    let store = CsvStore::new(temp.path());
    let engine = MetricsEngine::new(&store, None);
    let cfg = config("2024-01-01", "2024-01-31", Frequency::Daily);

    let portfolio = Portfolio::new(
        "pair",
        BTreeMap::from([(ticker("A"), 0.5), (ticker("B"), 0.5)]),
    )
    .expect("must build");

    let tickers = portfolio.tickers();
    let stdevs = engine
        .period_stdevs(&tickers, &cfg)
        .expect("must compute")
        .value;
    let matrix = engine
        .correlation_matrix(&tickers, &cfg)
        .expect("must compute")
        .value;

    let portfolio_vol =
        portfolio_volatility(&portfolio, &stdevs, &matrix, true, cfg.frequency).value;
    let single_vol = engine
        .annualized_volatilities(&tickers[..1], &cfg)
        .expect("must compute")
        .value[&tickers[0]];

    // Correlation 1 collapses the quadratic form to the scalar case.
    assert!((portfolio_vol - single_vol).abs() < 1e-9);
}

#[test]
fn full_analysis_produces_a_complete_report() {
    let temp = tempdir().expect("tempdir");
    write_ticker_csv(
        temp.path(),
        "AAPL",
        &[
            ("2024-01-02", 100.0, Some(0.011)),
            ("2024-01-03", 99.0, Some(-0.01)),
            ("2024-01-04", 101.0, Some(0.02)),
            ("2024-01-05", 100.5, Some(-0.005)),
        ],
    );
    write_ticker_csv(
        temp.path(),
        "MSFT",
        &[
            ("2024-01-02", 370.0, Some(0.006)),
            ("2024-01-03", 372.0, Some(0.0054)),
            ("2024-01-04", 369.0, Some(-0.008)),
            ("2024-01-05", 371.0, Some(0.0054)),
        ],
    );
    write_ticker_csv(temp.path(), "SPY", &MARKET_ROWS);
    let rates_path = temp.path().join("SOFR.csv");
    write_rates_csv(
        &rates_path,
        &[("01/02/2024", "5.00%"), ("01/03/2024", "5.00%")],
    );

    let store = CsvStore::new(temp.path());
    let riskfree = RiskFreeProvider::new(RateFileSource::new(&rates_path));
    let engine = MetricsEngine::new(&store, Some(&riskfree));
    let analyzer = Analyzer::new(engine);

    let portfolio = Portfolio::new(
        "growth",
        BTreeMap::from([(ticker("AAPL"), 0.6), (ticker("MSFT"), 0.4)]),
    )
    .expect("must build");

    let computed = analyzer
        .run(&portfolio, &config("2024-01-01", "2024-01-31", Frequency::Daily))
        .expect("analysis should complete");
    let report = computed.value;

    assert_eq!(report.portfolio_name, "growth");
    assert_eq!(report.tickers.annualized_return.len(), 2);
    assert_eq!(report.tickers.beta.len(), 2);
    assert!(report.tickers.beta.values().all(Option::is_some));
    assert!((report.risk_free_rate - 0.05).abs() < 1e-12);

    // Aggregates are finite for this well-behaved fixture.
    assert!(report.portfolio.annualized_return.is_finite());
    assert!(report.portfolio.annualized_volatility > 0.0);
    assert!(report.portfolio.sharpe.is_finite());
    assert!(report.portfolio.treynor.is_finite());

    // Daily series feed the excluded charting layer.
    assert_eq!(report.daily_portfolio_returns.len(), 4);
    assert!(report.daily_benchmark_returns.is_some());

    // The report serializes cleanly for the envelope consumers.
    let raw = serde_json::to_value(&report).expect("must serialize");
    assert!(raw.get("correlation").is_some());
    assert_eq!(
        raw["tickers"]["annualized_return"]
            .as_object()
            .expect("table is a map")
            .len(),
        2
    );
}

#[test]
fn drifted_weights_surface_as_a_warning_not_an_error() {
    let temp = tempdir().expect("tempdir");
    write_ticker_csv(temp.path(), "AAPL", &MARKET_ROWS);
    write_ticker_csv(temp.path(), "SPY", &MARKET_ROWS);

    let store = CsvStore::new(temp.path());
    let engine = MetricsEngine::new(&store, None);
    let analyzer = Analyzer::new(engine);

    let portfolio = Portfolio::new("heavy", BTreeMap::from([(ticker("AAPL"), 1.4)]))
        .expect("must build");

    let computed = analyzer
        .run(&portfolio, &config("2024-01-01", "2024-01-31", Frequency::Daily))
        .expect("analysis should complete");

    assert!(computed
        .notices
        .iter()
        .any(|n| n.code == "portfolio.weight_sum"));
}

#[test]
fn missing_market_degrades_beta_and_benchmark_to_notices() {
    let temp = tempdir().expect("tempdir");
    write_ticker_csv(temp.path(), "AAPL", &MARKET_ROWS);
    // No SPY file: beta/alpha and the benchmark series cannot be computed.

    let store = CsvStore::new(temp.path());
    let engine = MetricsEngine::new(&store, None);
    let analyzer = Analyzer::new(engine);

    let portfolio = Portfolio::new("solo", BTreeMap::from([(ticker("AAPL"), 1.0)]))
        .expect("must build");

    let computed = analyzer
        .run(&portfolio, &config("2024-01-01", "2024-01-31", Frequency::Daily))
        .expect("analysis should still complete");
    let report = computed.value;

    assert_eq!(report.tickers.beta[&ticker("AAPL")], None);
    assert_eq!(report.tickers.alpha[&ticker("AAPL")], None);
    assert!(report.daily_benchmark_returns.is_none());
    assert!(computed
        .notices
        .iter()
        .any(|n| n.code == "metrics.beta_unavailable"));
    assert!(computed
        .notices
        .iter()
        .any(|n| n.code == "benchmark.unavailable"));
}

#[test]
fn monotone_rising_portfolio_reports_zero_max_drawdown() {
    let temp = tempdir().expect("tempdir");
    write_ticker_csv(
        temp.path(),
        "AAPL",
        &[
            ("2024-01-02", 100.0, Some(0.01)),
            ("2024-01-03", 101.0, Some(0.01)),
            ("2024-01-04", 102.0, Some(0.0099)),
        ],
    );
    write_ticker_csv(temp.path(), "SPY", &MARKET_ROWS);

    let store = CsvStore::new(temp.path());
    let engine = MetricsEngine::new(&store, None);
    let analyzer = Analyzer::new(engine);

    let portfolio = Portfolio::new("riser", BTreeMap::from([(ticker("AAPL"), 1.0)]))
        .expect("must build");

    let report = analyzer
        .run(&portfolio, &config("2024-01-01", "2024-01-31", Frequency::Daily))
        .expect("analysis should complete")
        .value;

    assert_eq!(report.portfolio.max_drawdown, 0.0);
    assert_eq!(report.portfolio.pct_from_high_water, 0.0);
    assert!(report.portfolio.distribution.positive_share > 0.99);
}

#[test]
fn analysis_frequency_does_not_change_drawdown_inputs() {
    let temp = tempdir().expect("tempdir");
    // A dip inside a month: monthly resampling would hide it.
    write_ticker_csv(
        temp.path(),
        "AAPL",
        &[
            ("2024-01-02", 100.0, Some(0.10)),
            ("2024-01-15", 50.0, Some(-0.50)),
            ("2024-01-31", 55.0, Some(0.10)),
            ("2024-02-15", 60.0, Some(0.09)),
        ],
    );
    write_ticker_csv(
        temp.path(),
        "SPY",
        &[
            ("2024-01-02", 470.0, Some(0.01)),
            ("2024-01-15", 468.0, Some(-0.002)),
            ("2024-01-31", 474.0, Some(0.006)),
            ("2024-02-15", 476.0, Some(0.004)),
        ],
    );

    let store = CsvStore::new(temp.path());
    let engine = MetricsEngine::new(&store, None);
    let analyzer = Analyzer::new(engine);

    let portfolio = Portfolio::new("dipper", BTreeMap::from([(ticker("AAPL"), 1.0)]))
        .expect("must build");

    let report = analyzer
        .run(
            &portfolio,
            &config("2024-01-01", "2024-02-28", Frequency::Monthly),
        )
        .expect("analysis should complete")
        .value;

    // The intra-month 50% crash is visible even at monthly analysis
    // frequency because drawdown always runs on the daily series.
    assert!((report.portfolio.max_drawdown - (-0.5)).abs() < 1e-9);
}
