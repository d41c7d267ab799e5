//! CSV import provider.
//!
//! Reads `{dir}/{SYMBOL}.csv` files laid out the way Yahoo's download
//! endpoint exported them (`Date,Open,High,Low,Close,Adj Close,Volume`).
//! Extra columns are tolerated; normalization drops them.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::DateWindow;
use polars::prelude::*;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    // The whole file is returned; the fetcher applies the date window.
    fn fetch(&self, symbol: &str, _window: DateWindow) -> Result<FetchResult, DataError> {
        let path = self.symbol_path(symbol);
        if !path.is_file() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        debug!(symbol, path = %path.display(), "reading csv export");

        let frame = LazyCsvReader::new(&path)
            .with_has_header(true)
            .with_try_parse_dates(true)
            .finish()?
            .collect()?;

        if frame.height() == 0 {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(FetchResult {
            symbol: symbol.to_string(),
            frame,
            source: DataSource::CsvImport,
        })
    }
}
