//! Run configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is valid. The CLI
//! layers its flags on top of whatever is loaded here.

use crate::data::fetcher::parse_date;
use crate::data::yahoo::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::data::{CsvProvider, DataError, DataProvider, YahooProvider};
use crate::store::{DEFAULT_DB_PATH, DEFAULT_TABLE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_START_DATE: &str = "2020-01-01";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {field} '{value}' in config (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },
}

/// Which provider supplies the price tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub source: ProviderKind,
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Directory of `{SYMBOL}.csv` exports, used when `source = "csv"`.
    pub csv_dir: PathBuf,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            source: ProviderKind::Yahoo,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            csv_dir: PathBuf::from("data/csv"),
        }
    }
}

impl ProviderConfig {
    pub fn build_provider(&self) -> Result<Box<dyn DataProvider>, DataError> {
        Ok(match self.source {
            ProviderKind::Yahoo => Box::new(YahooProvider::new(
                self.base_url.clone(),
                Duration::from_secs(self.timeout_secs),
                &self.user_agent,
            )?),
            ProviderKind::Csv => Box::new(CsvProvider::new(&self.csv_dir)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub start_date: String,
    pub end_date: Option<String>,
    pub provider: ProviderConfig,
    pub database: DatabaseConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            start_date: DEFAULT_START_DATE.to_string(),
            end_date: None,
            provider: ProviderConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl IngestConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string. Dates are checked here so a bad
    /// file fails before any network traffic.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;

        parse_date(&config.start_date).map_err(|_| ConfigError::InvalidDate {
            field: "start_date",
            value: config.start_date.clone(),
        })?;
        if let Some(end) = &config.end_date {
            parse_date(end).map_err(|_| ConfigError::InvalidDate {
                field: "end_date",
                value: end.clone(),
            })?;
        }

        Ok(config)
    }
}
