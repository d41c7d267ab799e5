//! Ingest orchestrator: fetch → store, one ticker at a time.

use crate::data::{DataError, Fetcher, IngestProgress};
use crate::domain::{normalize_symbol, DateWindow};
use crate::store::{self, StoreError};
use std::path::Path;
use thiserror::Error;
use tracing::{info, info_span};

/// A failed run, tagged with the ticker that stopped it.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to fetch {ticker}")]
    Fetch {
        ticker: String,
        #[source]
        source: DataError,
    },

    #[error("failed to ingest {ticker}")]
    Store {
        ticker: String,
        #[source]
        source: StoreError,
    },
}

impl IngestError {
    pub fn ticker(&self) -> &str {
        match self {
            IngestError::Fetch { ticker, .. } | IngestError::Store { ticker, .. } => ticker,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// `(symbol, rows inserted)` in processing order.
    pub tickers: Vec<(String, usize)>,
    pub rows: usize,
}

/// Fetch and ingest each ticker in order.
///
/// Every ticker's rows are committed before the next ticker is fetched. The
/// first error aborts the run; tickers already ingested stay in the table.
pub fn run_ingest(
    fetcher: &Fetcher,
    destination: &Path,
    table: &str,
    tickers: &[&str],
    window: DateWindow,
    progress: &dyn IngestProgress,
) -> Result<RunSummary, IngestError> {
    let total = tickers.len();
    let mut summary = RunSummary::default();

    for (i, raw) in tickers.iter().enumerate() {
        let symbol = normalize_symbol(raw).unwrap_or_else(|| raw.to_string());
        let span = info_span!("ticker", symbol = %symbol, index = i, total);
        let _enter = span.enter();

        progress.on_start(&symbol, i, total);

        let rows = fetcher
            .fetch(raw, window)
            .map_err(|source| IngestError::Fetch {
                ticker: symbol.clone(),
                source,
            })?;
        progress.on_fetched(&symbol, rows.len());

        let inserted =
            store::ingest(&rows, destination, table).map_err(|source| IngestError::Store {
                ticker: symbol.clone(),
                source,
            })?;
        progress.on_ingested(&symbol, inserted);
        info!(rows = inserted, "ticker ingested");

        summary.rows += inserted;
        summary.tickers.push((symbol, inserted));
    }

    progress.on_batch_complete(summary.tickers.len(), summary.rows);
    Ok(summary)
}
