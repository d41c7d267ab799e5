//! Column normalization: provider-native frame → canonical `PriceRow` layout.
//!
//! Providers disagree on naming (`Adj Close`, `Adj_Close`, `adjclose`) and carry
//! extra columns (`Dividends`, `Stock Splits`). Normalization maps the known
//! names onto the canonical schema, coerces types, appends the `ticker` column
//! and drops everything else. Row order is left untouched.

use super::provider::DataError;
use super::schema::{PriceSchema, PRICE_COLUMNS};
use crate::domain::PriceRow;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashMap;

/// Normalizer for provider frames
pub struct Normalizer;

impl Normalizer {
    /// Map a provider column name onto its canonical name, ignoring case,
    /// spaces and underscores. Unknown names map to `None` and are dropped.
    pub fn canonical_name(raw: &str) -> Option<&'static str> {
        let key: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "date" => Some("date"),
            "open" => Some("open"),
            "high" => Some("high"),
            "low" => Some("low"),
            "close" => Some("close"),
            "adjclose" | "adjustedclose" => Some("adj_close"),
            "volume" => Some("volume"),
            _ => None,
        }
    }

    /// Rename, coerce and reorder a provider frame into the canonical schema,
    /// attaching `ticker` to every row.
    ///
    /// A missing adjusted-close column is filled from `close`.
    pub fn normalize(raw: &DataFrame, ticker: &str) -> Result<DataFrame, DataError> {
        let height = raw.height();

        // First match wins when a provider repeats a column under two spellings.
        let mut found: HashMap<&'static str, &Column> = HashMap::new();
        for column in raw.get_columns() {
            if let Some(canonical) = Self::canonical_name(column.name().as_str()) {
                found.entry(canonical).or_insert(column);
            }
        }

        let source = |name: &str| -> Result<Column, DataError> {
            found
                .get(name)
                .map(|c| (*c).clone())
                .ok_or_else(|| DataError::MissingColumn {
                    symbol: ticker.to_string(),
                    column: name.to_string(),
                })
        };

        let mut columns = Vec::with_capacity(PRICE_COLUMNS.len());
        for spec in PRICE_COLUMNS.iter() {
            let column = match spec.name {
                "ticker" => Column::new("ticker".into(), vec![ticker; height]),
                "adj_close" if !found.contains_key("adj_close") => source("close")?,
                name => source(name)?,
            };
            columns.push(
                column
                    .cast(&spec.kind.dtype())?
                    .with_name(spec.name.into()),
            );
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Convert a normalized frame into rows.
    ///
    /// Null prices become NaN, a null volume becomes 0 and a null adjusted
    /// close falls back to that row's close. A null date is an error.
    pub fn to_rows(df: &DataFrame) -> Result<Vec<PriceRow>, DataError> {
        PriceSchema::validate(df)?;

        let date_ca = df.column("date")?.date()?;
        let open_ca = df.column("open")?.f64()?;
        let high_ca = df.column("high")?.f64()?;
        let low_ca = df.column("low")?.f64()?;
        let close_ca = df.column("close")?.f64()?;
        let adj_ca = df.column("adj_close")?.f64()?;
        let vol_ca = df.column("volume")?.i64()?;
        let ticker_ca = df.column("ticker")?.str()?;

        // Date columns count days since 1970-01-01.
        let epoch = NaiveDate::default();
        let n = df.height();
        let mut rows = Vec::with_capacity(n);

        for i in 0..n {
            let days = date_ca.get(i).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("null date at row {i}"))
            })?;
            let close = close_ca.get(i).unwrap_or(f64::NAN);

            rows.push(PriceRow {
                date: epoch + chrono::Duration::days(days as i64),
                open: open_ca.get(i).unwrap_or(f64::NAN),
                high: high_ca.get(i).unwrap_or(f64::NAN),
                low: low_ca.get(i).unwrap_or(f64::NAN),
                close,
                adj_close: adj_ca.get(i).unwrap_or(close),
                volume: vol_ca.get(i).unwrap_or(0),
                ticker: ticker_ca.get(i).unwrap_or_default().to_string(),
            });
        }

        Ok(rows)
    }
}
