//! PriceRow — one ticker's daily OHLCV observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV row in the canonical column order.
///
/// Field order matches the `stock_prices` table: rows are inserted by position,
/// so reordering these fields is a schema change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: i64,
    pub ticker: String,
}

/// Trim and uppercase a requested symbol. Returns `None` for blank input.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}

/// Half-open date window `[start, end)`. An absent end means "up to now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// Build a window, rejecting `end <= start`.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Option<Self> {
        match end {
            Some(end) if end <= start => None,
            _ => Some(Self { start, end }),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.map_or(true, |end| date < end)
    }
}
