//! End-to-end ingest tests: CSV fixtures → Fetcher → DuckDB.
//!
//! Fixtures under `tests/fixtures/` are Yahoo-style exports, so the full
//! normalization path runs without network access.

use chrono::NaiveDate;
use std::path::PathBuf;
use tickerbase_core::config::{IngestConfig, ProviderKind};
use tickerbase_core::data::{parse_window, CsvProvider, DataError, Fetcher, IngestProgress};
use tickerbase_core::store::{PriceStore, DEFAULT_TABLE};
use tickerbase_core::{run_ingest, IngestError};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn csv_fetcher() -> Fetcher {
    Fetcher::new(Box::new(CsvProvider::new(fixture_dir())))
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

struct Quiet;

impl IngestProgress for Quiet {
    fn on_start(&self, _ticker: &str, _index: usize, _total: usize) {}
    fn on_fetched(&self, _ticker: &str, _rows: usize) {}
    fn on_batch_complete(&self, _tickers: usize, _rows: usize) {}
}

// ──────────────────────────────────────────────
// Fetch
// ──────────────────────────────────────────────

#[test]
fn aapl_first_january_week_has_three_rows() {
    let rows = csv_fetcher()
        .fetch_range("AAPL", "2024-01-02", Some("2024-01-05"))
        .unwrap();

    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4)]);
    assert!(rows.iter().all(|r| r.ticker == "AAPL"));
}

#[test]
fn fetched_dates_are_ordered_and_inside_window() {
    let window = parse_window("2024-01-04", Some("2024-01-12")).unwrap();
    let rows = csv_fetcher().fetch("spy", window).unwrap();

    assert!(!rows.is_empty());
    for pair in rows.windows(2) {
        assert!(pair[0].date <= pair[1].date);
    }
    for row in &rows {
        assert!(window.contains(row.date), "{} outside window", row.date);
        assert_eq!(row.ticker, "SPY");
    }
    assert_eq!(rows.first().unwrap().date, d(2024, 1, 4));
    assert_eq!(rows.last().unwrap().date, d(2024, 1, 11));
}

#[test]
fn unknown_ticker_is_symbol_not_found() {
    let err = csv_fetcher().fetch_range("ZZZZ", "2024-01-02", None).unwrap_err();
    assert!(matches!(err, DataError::SymbolNotFound { symbol } if symbol == "ZZZZ"));
}

// ──────────────────────────────────────────────
// Ingest
// ──────────────────────────────────────────────

#[test]
fn ingesting_spy_twice_doubles_row_count() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("data/financial.duckdb");
    let fetcher = csv_fetcher();
    let window = parse_window("2024-01-01", None).unwrap();

    let first = run_ingest(&fetcher, &db, DEFAULT_TABLE, &["SPY"], window, &Quiet).unwrap();
    let second = run_ingest(&fetcher, &db, DEFAULT_TABLE, &["SPY"], window, &Quiet).unwrap();

    assert_eq!(first.rows, 10);
    assert_eq!(second.rows, 10);
    let store = PriceStore::open(&db, DEFAULT_TABLE).unwrap();
    assert_eq!(store.row_count_for("SPY").unwrap(), 20);
}

#[test]
fn unknown_ticker_aborts_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("financial.duckdb");
    let window = parse_window("2024-01-01", None).unwrap();

    let err = run_ingest(&csv_fetcher(), &db, DEFAULT_TABLE, &["ZZZZ", "SPY"], window, &Quiet)
        .unwrap_err();

    assert_eq!(err.ticker(), "ZZZZ");
    assert!(matches!(err, IngestError::Fetch { .. }));
    assert!(!db.exists(), "no database should be created before the first write");
}

#[test]
fn window_without_trading_days_ingests_zero_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("data/financial.duckdb");
    // Saturday and Sunday
    let window = parse_window("2024-01-13", Some("2024-01-15")).unwrap();

    let summary =
        run_ingest(&csv_fetcher(), &db, DEFAULT_TABLE, &["SPY", "AAPL"], window, &Quiet).unwrap();

    assert_eq!(
        summary.tickers,
        vec![("SPY".to_string(), 0), ("AAPL".to_string(), 0)]
    );
    assert!(db.is_file());
    let store = PriceStore::open(&db, DEFAULT_TABLE).unwrap();
    assert_eq!(store.row_count().unwrap(), 0);
    assert_eq!(store.table_columns().unwrap().len(), 8);
}

#[test]
fn unknown_ticker_mid_run_keeps_earlier_tickers() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("financial.duckdb");
    let window = parse_window("2024-01-01", None).unwrap();

    let err = run_ingest(
        &csv_fetcher(),
        &db,
        DEFAULT_TABLE,
        &["SPY", "ZZZZ", "AAPL"],
        window,
        &Quiet,
    )
    .unwrap_err();

    assert_eq!(err.ticker(), "ZZZZ");
    assert!(matches!(
        err,
        IngestError::Fetch {
            source: DataError::SymbolNotFound { .. },
            ..
        }
    ));

    let store = PriceStore::open(&db, DEFAULT_TABLE).unwrap();
    assert_eq!(store.row_count_for("SPY").unwrap(), 10);
    assert_eq!(store.row_count_for("ZZZZ").unwrap(), 0);
    assert_eq!(store.row_count_for("AAPL").unwrap(), 0);
    assert_eq!(store.row_count().unwrap(), 10);
}

#[test]
fn stored_rows_match_fetched_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("financial.duckdb");
    let fetcher = csv_fetcher();
    let window = parse_window("2024-01-01", Some("2024-01-08")).unwrap();

    let fetched = fetcher.fetch("AAPL", window).unwrap();
    run_ingest(&fetcher, &db, DEFAULT_TABLE, &["AAPL"], window, &Quiet).unwrap();
    let loaded = PriceStore::open(&db, DEFAULT_TABLE).unwrap().load("AAPL").unwrap();

    assert_eq!(loaded, fetched);
    assert_eq!(loaded.len(), 4);
}

#[test]
fn extra_provider_columns_never_reach_the_table() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("financial.duckdb");
    let window = parse_window("2024-01-01", None).unwrap();

    run_ingest(&csv_fetcher(), &db, DEFAULT_TABLE, &["AAPL"], window, &Quiet).unwrap();

    let store = PriceStore::open(&db, DEFAULT_TABLE).unwrap();
    let names: Vec<String> = store.table_columns().unwrap().into_iter().map(|(n, _)| n).collect();
    assert_eq!(
        names,
        vec!["date", "open", "high", "low", "close", "adj_close", "volume", "ticker"]
    );
}

#[test]
fn multiple_tickers_share_one_table() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("financial.duckdb");
    let window = parse_window("2024-01-02", Some("2024-01-05")).unwrap();

    let summary =
        run_ingest(&csv_fetcher(), &db, DEFAULT_TABLE, &["SPY", "aapl"], window, &Quiet).unwrap();

    assert_eq!(
        summary.tickers,
        vec![("SPY".to_string(), 3), ("AAPL".to_string(), 3)]
    );
    let store = PriceStore::open(&db, DEFAULT_TABLE).unwrap();
    assert_eq!(store.row_count().unwrap(), 6);
    assert_eq!(store.row_count_for("AAPL").unwrap(), 3);
}

// ──────────────────────────────────────────────
// Config-driven runs
// ──────────────────────────────────────────────

#[test]
fn csv_config_drives_a_full_run() {
    let dir = tempfile::tempdir().unwrap();
    let toml = format!(
        r#"
        start_date = "2024-01-08"

        [provider]
        source = "csv"
        csv_dir = {csv_dir:?}

        [database]
        path = {db:?}
        table = "daily_prices"
        "#,
        csv_dir = fixture_dir().display().to_string(),
        db = dir.path().join("cfg.duckdb").display().to_string(),
    );
    let config = IngestConfig::from_toml(&toml).unwrap();
    assert_eq!(config.provider.source, ProviderKind::Csv);

    let fetcher = Fetcher::new(config.provider.build_provider().unwrap());
    let window = parse_window(&config.start_date, config.end_date.as_deref()).unwrap();
    let summary = run_ingest(
        &fetcher,
        &config.database.path,
        &config.database.table,
        &["SPY"],
        window,
        &Quiet,
    )
    .unwrap();

    assert_eq!(summary.rows, 6);
    let store = PriceStore::open(&config.database.path, "daily_prices").unwrap();
    assert_eq!(store.row_count().unwrap(), 6);
}
