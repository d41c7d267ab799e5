//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over price sources (Yahoo Finance, CSV
//! exports) so the fetcher can swap implementations and tests can mock them.
//! Providers return their table as-is; column normalization happens later in
//! [`super::normalize`].

use super::schema::SchemaError;
use crate::domain::DateWindow;
use chrono::NaiveDate;
use polars::prelude::{DataFrame, PolarsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for fetch operations.
///
/// These are designed to be displayable at the CLI edge without extra context.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("provider returned HTTP {status} for {symbol}")]
    HttpStatus { symbol: String, status: u16 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("invalid ticker symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("start date {start} must precede end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("provider table for {symbol} has no '{column}' column")]
    MissingColumn { symbol: String, column: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("frame error: {0}")]
    Frame(#[from] PolarsError),
}

/// Result of a successful fetch for a single symbol.
///
/// `frame` carries provider-native column names (`Date`, `Adj Close`, ...).
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub frame: DataFrame,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
}

/// Trait for data providers (Yahoo Finance, CSV import, etc).
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV rows for an already-normalized symbol.
    fn fetch(&self, symbol: &str, window: DateWindow) -> Result<FetchResult, DataError>;
}

/// Progress callback for multi-ticker runs.
pub trait IngestProgress {
    /// Called before fetching a ticker.
    fn on_start(&self, ticker: &str, index: usize, total: usize);

    /// Called after the fetch, before rows are written.
    fn on_fetched(&self, ticker: &str, rows: usize);

    /// Called once the ticker's rows are committed.
    fn on_ingested(&self, _ticker: &str, _rows: usize) {}

    /// Called when every ticker has been ingested.
    fn on_batch_complete(&self, tickers: usize, rows: usize);
}

/// Progress reporter that prints the run's progress lines to stdout.
pub struct StdoutProgress;

impl IngestProgress for StdoutProgress {
    fn on_start(&self, ticker: &str, _index: usize, _total: usize) {
        println!("Fetching data for {ticker}...");
    }

    fn on_fetched(&self, ticker: &str, rows: usize) {
        println!("Ingesting {rows} rows for {ticker} into DuckDB...");
    }

    fn on_batch_complete(&self, _tickers: usize, _rows: usize) {
        println!("Done.");
    }
}
