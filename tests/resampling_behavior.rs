//! Behavior tests for frequency resampling and the series provider.

use folio_analytics::{AnalyticsError, SeriesProvider};
use folio_core::Frequency;
use folio_store::CsvStore;
use folio_tests::{range, ticker, write_ticker_csv};
use tempfile::tempdir;

#[test]
fn resampling_to_daily_is_the_identity_transform() {
    let temp = tempdir().expect("tempdir");
    let rows = [
        ("2024-01-02", 100.0, Some(0.01)),
        ("2024-01-03", 98.0, Some(-0.02)),
        ("2024-01-04", 99.5, Some(0.0153)),
    ];
    write_ticker_csv(temp.path(), "AAPL", &rows);
    let store = CsvStore::new(temp.path());
    let provider = SeriesProvider::new(&store);

    let series = provider
        .returns(
            &ticker("AAPL"),
            &range("2024-01-01", "2024-01-31"),
            Frequency::Daily,
        )
        .expect("must build")
        .value;

    assert_eq!(series.len(), rows.len());
    for (observed, expected) in series.values().iter().zip(rows.iter()) {
        assert_eq!(*observed, expected.2.unwrap());
    }
}

#[test]
fn monthly_recombination_reproduces_the_daily_cumulative_return() {
    let temp = tempdir().expect("tempdir");
    let rows = [
        ("2024-01-02", 100.0, Some(0.011)),
        ("2024-01-17", 101.0, Some(-0.004)),
        ("2024-02-06", 103.0, Some(0.021)),
        ("2024-02-21", 102.0, Some(-0.009)),
        ("2024-03-05", 104.0, Some(0.016)),
    ];
    write_ticker_csv(temp.path(), "AAPL", &rows);
    let store = CsvStore::new(temp.path());
    let provider = SeriesProvider::new(&store);
    let window = range("2024-01-01", "2024-03-31");

    let daily = provider
        .returns(&ticker("AAPL"), &window, Frequency::Daily)
        .expect("must build")
        .value;
    let monthly = provider
        .returns(&ticker("AAPL"), &window, Frequency::Monthly)
        .expect("must build")
        .value;

    assert_eq!(monthly.len(), 3);
    assert!((daily.cumulative_return() - monthly.cumulative_return()).abs() < 1e-12);
}

#[test]
fn periods_with_no_observations_are_dropped_not_zero_filled() {
    let temp = tempdir().expect("tempdir");
    // Nothing observed in February.
    write_ticker_csv(
        temp.path(),
        "AAPL",
        &[
            ("2024-01-15", 100.0, Some(0.01)),
            ("2024-03-15", 101.0, Some(0.01)),
        ],
    );
    let store = CsvStore::new(temp.path());
    let provider = SeriesProvider::new(&store);

    let monthly = provider
        .returns(
            &ticker("AAPL"),
            &range("2024-01-01", "2024-03-31"),
            Frequency::Monthly,
        )
        .expect("must build")
        .value;

    assert_eq!(monthly.len(), 2);
}

#[test]
fn all_zero_series_is_flagged_as_degenerate_but_succeeds() {
    let temp = tempdir().expect("tempdir");
    write_ticker_csv(
        temp.path(),
        "FLAT",
        &[
            ("2024-01-02", 100.0, Some(0.0)),
            ("2024-01-03", 100.0, Some(0.0)),
            ("2024-01-04", 100.0, Some(0.0)),
        ],
    );
    let store = CsvStore::new(temp.path());
    let provider = SeriesProvider::new(&store);

    let computed = provider
        .returns(
            &ticker("FLAT"),
            &range("2024-01-01", "2024-01-31"),
            Frequency::Daily,
        )
        .expect("degenerate series is valid");

    assert_eq!(computed.value.len(), 3);
    assert!(computed
        .notices
        .iter()
        .any(|n| n.code == "series.zero_volatility"));
}

#[test]
fn series_of_only_non_finite_values_fails_with_empty_series() {
    let temp = tempdir().expect("tempdir");
    write_ticker_csv(
        temp.path(),
        "NAN",
        &[
            ("2024-01-02", 100.0, Some(f64::NAN)),
            ("2024-01-03", 100.0, Some(f64::NAN)),
        ],
    );
    let store = CsvStore::new(temp.path());
    let provider = SeriesProvider::new(&store);

    let result = provider.returns(
        &ticker("NAN"),
        &range("2024-01-01", "2024-01-31"),
        Frequency::Daily,
    );

    assert!(matches!(result, Err(AnalyticsError::EmptySeries { .. })));
}

#[test]
fn price_series_resamples_to_last_observation_in_period() {
    let temp = tempdir().expect("tempdir");
    write_ticker_csv(
        temp.path(),
        "AAPL",
        &[
            ("2024-01-02", 100.0, Some(0.01)),
            ("2024-01-31", 105.0, Some(0.01)),
            ("2024-02-15", 99.0, Some(-0.02)),
        ],
    );
    let store = CsvStore::new(temp.path());
    let provider = SeriesProvider::new(&store);

    let monthly = provider
        .prices(
            &ticker("AAPL"),
            &range("2024-01-01", "2024-02-28"),
            Frequency::Monthly,
        )
        .expect("must build");

    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0].value, 105.0);
    assert_eq!(monthly[1].value, 99.0);
}
