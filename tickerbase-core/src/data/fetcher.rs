//! Fetcher: provider call → column normalization → canonical rows.

use super::normalize::Normalizer;
use super::provider::{DataError, DataProvider};
use crate::domain::{normalize_symbol, DateWindow, PriceRow};
use chrono::NaiveDate;
use tracing::debug;

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DataError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| DataError::InvalidDate(raw.to_string()))
}

/// Parse a start date and optional end date into a half-open window.
pub fn parse_window(start: &str, end: Option<&str>) -> Result<DateWindow, DataError> {
    let start = parse_date(start)?;
    let end = end.map(parse_date).transpose()?;
    window(start, end)
}

/// Build a window, reporting `end <= start` as [`DataError::InvalidDateRange`].
pub fn window(start: NaiveDate, end: Option<NaiveDate>) -> Result<DateWindow, DataError> {
    DateWindow::new(start, end).ok_or_else(|| DataError::InvalidDateRange {
        start,
        // `new` only refuses a present end
        end: end.unwrap_or(start),
    })
}

/// Fetches one ticker at a time from a provider and returns canonical rows.
pub struct Fetcher {
    provider: Box<dyn DataProvider>,
}

impl Fetcher {
    pub fn new(provider: Box<dyn DataProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch rows for `ticker` inside `window`.
    ///
    /// Rows keep the provider's (chronological) order. Every row carries the
    /// uppercased ticker; rows outside `[start, end)` are dropped.
    pub fn fetch(&self, ticker: &str, window: DateWindow) -> Result<Vec<PriceRow>, DataError> {
        let symbol =
            normalize_symbol(ticker).ok_or_else(|| DataError::InvalidSymbol(ticker.to_string()))?;

        let result = self.provider.fetch(&symbol, window)?;
        let frame = Normalizer::normalize(&result.frame, &symbol)?;
        let mut rows = Normalizer::to_rows(&frame)?;

        let fetched = rows.len();
        rows.retain(|row| window.contains(row.date));
        debug!(
            symbol = %symbol,
            source = ?result.source,
            fetched,
            kept = rows.len(),
            "normalized provider rows"
        );

        Ok(rows)
    }

    /// String-date form of [`Fetcher::fetch`].
    pub fn fetch_range(
        &self,
        ticker: &str,
        start_date: &str,
        end_date: Option<&str>,
    ) -> Result<Vec<PriceRow>, DataError> {
        self.fetch(ticker, parse_window(start_date, end_date)?)
    }
}
