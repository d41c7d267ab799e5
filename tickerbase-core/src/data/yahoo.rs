//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV rows from Yahoo's v8 chart API and returns them as a
//! frame with Yahoo's own column names (`Date`, `Open`, ..., `Adj Close`,
//! `Volume`). One request per symbol, no retries: any failure is returned to
//! the caller as-is.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.
//! The CSV provider is the fallback when Yahoo is unavailable.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::DateWindow;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

// Yahoo sends `{}` for the quote block when the window has no rows.
#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build the chart API URL for a symbol and date window.
    ///
    /// Bars are stamped at the exchange's local open, which can fall on the
    /// previous UTC day, so the request is padded by a day on each side. The
    /// fetcher trims rows back to the exact window in exchange-local dates.
    /// `period2` is now when the window is open-ended.
    fn chart_url(&self, symbol: &str, window: DateWindow) -> String {
        let start_ts = midnight_utc(window.start.pred_opt().unwrap_or(window.start));
        let end_ts = window
            .end
            .map(|end| midnight_utc(end.succ_opt().unwrap_or(end)))
            .unwrap_or_else(|| chrono::Utc::now().timestamp());
        let path_symbol = symbol.replace('^', "%5E");
        format!(
            "{}/v8/finance/chart/{path_symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true&events=history",
            self.base_url
        )
    }

    /// Parse a chart API body into a provider-native frame.
    pub fn parse_body(symbol: &str, body: &str) -> Result<DataFrame, DataError> {
        let chart: ChartResponse = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;
        Self::parse_response(symbol, chart)
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<DataFrame, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
        let timestamps = data.timestamp.unwrap_or_default();
        let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let n = timestamps.len();
        let mut dates: Vec<i32> = Vec::with_capacity(n);
        let mut opens = Vec::with_capacity(n);
        let mut highs = Vec::with_capacity(n);
        let mut lows = Vec::with_capacity(n);
        let mut closes = Vec::with_capacity(n);
        let mut adjs = Vec::with_capacity(n);
        let mut volumes = Vec::with_capacity(n);
        let epoch = NaiveDate::default();

        for (i, &ts) in timestamps.iter().enumerate() {
            // Exchange-local calendar date, not the UTC one.
            let date = chrono::DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Skip rows where all OHLCV are None (holidays/non-trading days)
            if open.is_none()
                && high.is_none()
                && low.is_none()
                && close.is_none()
                && volume.is_none()
            {
                continue;
            }

            dates.push((date - epoch).num_days() as i32);
            opens.push(open);
            highs.push(high);
            lows.push(low);
            closes.push(close);
            volumes.push(volume);
            adjs.push(
                adj_closes
                    .as_ref()
                    .and_then(|v| v.get(i).copied().flatten()),
            );
        }

        // A known symbol with no trading days in the window yields an empty frame.
        let mut columns = vec![
            Column::new("Date".into(), dates).cast(&DataType::Date)?,
            Column::new("Open".into(), opens),
            Column::new("High".into(), highs),
            Column::new("Low".into(), lows),
            Column::new("Close".into(), closes),
        ];
        if adj_closes.is_some() {
            columns.push(Column::new("Adj Close".into(), adjs));
        }
        columns.push(Column::new("Volume".into(), volumes));

        Ok(DataFrame::new(columns)?)
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, symbol: &str, window: DateWindow) -> Result<FetchResult, DataError> {
        let url = self.chart_url(symbol, window);
        debug!(symbol, %url, "requesting chart");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let frame = Self::parse_body(symbol, &body)?;
        debug!(symbol, rows = frame.height(), "parsed chart response");

        Ok(FetchResult {
            symbol: symbol.to_string(),
            frame,
            source: DataSource::YahooFinance,
        })
    }
}
