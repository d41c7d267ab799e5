//! Domain types shared by the fetch and ingest halves of the pipeline.

pub mod price_row;

pub use price_row::{normalize_symbol, DateWindow, PriceRow};
