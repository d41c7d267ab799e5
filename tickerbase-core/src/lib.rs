//! Tickerbase Core — daily price ingestion into DuckDB.
//!
//! - Domain types (`PriceRow`, date windows, symbol normalization)
//! - Providers returning provider-native frames (Yahoo Finance, CSV exports)
//! - Fetcher: column normalization into the fixed eight-column schema
//! - Price store: append-only DuckDB table
//! - Pipeline: sequential per-ticker fetch → ingest with progress reporting
//! - TOML configuration and `tracing` setup

pub mod config;
pub mod data;
pub mod domain;
pub mod logging;
pub mod pipeline;
pub mod store;

pub use config::{ConfigError, IngestConfig, ProviderKind};
pub use data::{DataError, Fetcher};
pub use domain::{DateWindow, PriceRow};
pub use pipeline::{run_ingest, IngestError, RunSummary};
pub use store::{ingest, PriceStore, StoreError};
