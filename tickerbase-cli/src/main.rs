//! Tickerbase CLI — fetch daily OHLCV prices and append them to DuckDB.
//!
//! ```text
//! tickerbase --tickers SPY QQQ --start_date 2020-01-01 --db_path data/financial.duckdb
//! ```
//!
//! Flags override the optional `--config` TOML file, which overrides the
//! built-in defaults.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tickerbase_core::data::{parse_window, Fetcher, StdoutProgress};
use tickerbase_core::logging::init_tracing;
use tickerbase_core::{run_ingest, IngestConfig, ProviderKind};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "tickerbase",
    about = "Fetch daily OHLCV prices per ticker and append them to a DuckDB table"
)]
struct Cli {
    /// Ticker symbols to ingest (e.g., SPY QQQ AAPL).
    #[arg(long, required = true, num_args = 1..)]
    tickers: Vec<String>,

    /// Start date (YYYY-MM-DD). Defaults to 2020-01-01.
    #[arg(long = "start_date")]
    start_date: Option<String>,

    /// End date (YYYY-MM-DD), exclusive. Defaults to now.
    #[arg(long = "end_date")]
    end_date: Option<String>,

    /// DuckDB file to append to. Defaults to data/financial.duckdb.
    #[arg(long = "db_path")]
    db_path: Option<PathBuf>,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Price source.
    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// Directory of {SYMBOL}.csv exports (with --source csv).
    #[arg(long = "csv_dir")]
    csv_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    Yahoo,
    Csv,
}

impl From<SourceArg> for ProviderKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Yahoo => ProviderKind::Yahoo,
            SourceArg::Csv => ProviderKind::Csv,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => IngestConfig::from_file(path)?,
        None => IngestConfig::default(),
    };
    let config = apply_overrides(&cli, base);

    let window = parse_window(&config.start_date, config.end_date.as_deref())?;
    let provider = config
        .provider
        .build_provider()
        .context("failed to set up price provider")?;
    let fetcher = Fetcher::new(provider);

    info!(
        provider = fetcher.provider_name(),
        db = %config.database.path.display(),
        table = %config.database.table,
        tickers = cli.tickers.len(),
        "starting ingest"
    );

    let tickers: Vec<&str> = cli.tickers.iter().map(|s| s.as_str()).collect();
    run_ingest(
        &fetcher,
        &config.database.path,
        &config.database.table,
        &tickers,
        window,
        &StdoutProgress,
    )?;

    Ok(())
}

/// Layer command-line flags over a loaded config.
fn apply_overrides(cli: &Cli, mut config: IngestConfig) -> IngestConfig {
    if let Some(start) = &cli.start_date {
        config.start_date = start.clone();
    }
    if let Some(end) = &cli.end_date {
        config.end_date = Some(end.clone());
    }
    if let Some(path) = &cli.db_path {
        config.database.path = path.clone();
    }
    if let Some(source) = cli.source {
        config.provider.source = source.into();
    }
    if let Some(dir) = &cli.csv_dir {
        config.provider.csv_dir = dir.clone();
    }
    config
}
