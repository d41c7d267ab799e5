//! Price data: providers, column normalization, and the fetcher.

pub mod csv;
pub mod fetcher;
pub mod normalize;
pub mod provider;
pub mod schema;
pub mod yahoo;

pub use csv::CsvProvider;
pub use fetcher::{parse_date, parse_window, Fetcher};
pub use normalize::Normalizer;
pub use provider::{DataError, DataProvider, DataSource, FetchResult, IngestProgress, StdoutProgress};
pub use schema::{PriceSchema, SchemaError, PRICE_COLUMNS};
pub use yahoo::YahooProvider;
