//! DuckDB price store.
//!
//! Layout: one table (default `stock_prices`) with the eight canonical columns
//! in canonical order. The store is append-only:
//!
//! - `CREATE TABLE IF NOT EXISTS` on open, never `ALTER`
//! - an existing table must match the schema positionally (name and type)
//! - each `append` is one transaction; nothing spans calls
//! - no deduplication, re-ingesting a range doubles its rows

use crate::data::schema::{PriceSchema, PRICE_COLUMNS};
use crate::domain::PriceRow;
use chrono::NaiveDate;
use duckdb::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_TABLE: &str = "stock_prices";
pub const DEFAULT_DB_PATH: &str = "data/financial.duckdb";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create database directory '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("invalid table name '{0}' (expected letters, digits and underscores)")]
    InvalidTableName(String),

    #[error("table '{table}' does not match the price schema: expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        table: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("stored date '{0}' is not YYYY-MM-DD")]
    InvalidStoredDate(String),
}

/// Table names are spliced into SQL, so only plain identifiers are accepted.
pub fn validate_table_name(table: &str) -> Result<(), StoreError> {
    let mut chars = table.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(StoreError::InvalidTableName(table.to_string()))
    }
}

/// An open DuckDB file with the price table ensured.
///
/// Dropping the store closes the connection.
pub struct PriceStore {
    conn: Connection,
    table: String,
}

impl PriceStore {
    /// Open (or create) the database file, creating its parent directory and
    /// the price table as needed.
    pub fn open(path: &Path, table: &str) -> Result<Self, StoreError> {
        validate_table_name(table)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        debug!(path = %path.display(), table, "opening duckdb");
        let conn = Connection::open(path)?;
        Self::with_connection(conn, table)
    }

    /// In-memory store, for benchmarks and scratch work.
    pub fn open_in_memory(table: &str) -> Result<Self, StoreError> {
        validate_table_name(table)?;
        Self::with_connection(Connection::open_in_memory()?, table)
    }

    fn with_connection(conn: Connection, table: &str) -> Result<Self, StoreError> {
        let store = Self {
            conn,
            table: table.to_string(),
        };
        store.ensure_table()?;
        Ok(store)
    }

    fn ensure_table(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(&PriceSchema::create_table_sql(&self.table))?;

        let found = self.table_columns()?;
        let matches = found.len() == PRICE_COLUMNS.len()
            && found
                .iter()
                .zip(PRICE_COLUMNS.iter())
                .all(|((name, sql_type), spec)| {
                    name == spec.name && sql_type.eq_ignore_ascii_case(spec.kind.sql_type())
                });

        if !matches {
            let render = |name: &str, ty: &str| format!("{name} {ty}");
            return Err(StoreError::SchemaMismatch {
                table: self.table.clone(),
                expected: PRICE_COLUMNS
                    .iter()
                    .map(|c| render(c.name, c.kind.sql_type()))
                    .collect(),
                found: found.iter().map(|(n, t)| render(n.as_str(), t.as_str())).collect(),
            });
        }
        Ok(())
    }

    /// `(name, type)` of each column in table order.
    pub fn table_columns(&self) -> Result<Vec<(String, String)>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE table_catalog = current_database() AND table_schema = current_schema() \
               AND lower(table_name) = lower(?) \
             ORDER BY ordinal_position",
        )?;
        let columns = stmt
            .query_map(params![self.table], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Append rows by column position inside a single transaction.
    ///
    /// Returns the number of rows inserted.
    pub fn append(&mut self, rows: &[PriceRow]) -> Result<usize, StoreError> {
        let sql = format!(
            "INSERT INTO {} VALUES (CAST(? AS DATE), ?, ?, ?, ?, ?, ?, ?)",
            self.table
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows {
                stmt.execute(params![
                    row.date.to_string(),
                    row.open,
                    row.high,
                    row.low,
                    row.close,
                    row.adj_close,
                    row.volume,
                    row.ticker,
                ])?;
            }
        }
        tx.commit()?;

        info!(table = %self.table, rows = rows.len(), "appended rows");
        Ok(rows.len())
    }

    pub fn row_count(&self) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let n: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(n as u64)
    }

    pub fn row_count_for(&self, ticker: &str) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE ticker = ?", self.table);
        let n: i64 = self.conn.query_row(&sql, params![ticker], |row| row.get(0))?;
        Ok(n as u64)
    }

    /// Load every stored row for a ticker, ordered by date.
    pub fn load(&self, ticker: &str) -> Result<Vec<PriceRow>, StoreError> {
        let sql = format!(
            "SELECT CAST(date AS VARCHAR), open, high, low, close, adj_close, volume, ticker \
             FROM {} WHERE ticker = ? ORDER BY date",
            self.table
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let raw = stmt
            .query_map(params![ticker], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, i64>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(date, open, high, low, close, adj_close, volume, ticker)| {
                let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .map_err(|_| StoreError::InvalidStoredDate(date.clone()))?;
                Ok(PriceRow {
                    date,
                    open,
                    high,
                    low,
                    close,
                    adj_close,
                    volume,
                    ticker,
                })
            })
            .collect()
    }
}

/// Append `rows` to `table` in the DuckDB file at `destination`.
///
/// The file (and its parent directory) is created if absent and the
/// connection is closed before returning, whatever the outcome.
pub fn ingest(rows: &[PriceRow], destination: &Path, table: &str) -> Result<usize, StoreError> {
    let mut store = PriceStore::open(destination, table)?;
    store.append(rows)
}
