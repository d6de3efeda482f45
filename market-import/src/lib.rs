//! Load per-catalog cabinet indexes into the marketplace database.
//!
//! This crate owns the cabinet ETL: fetching each catalog's index over
//! HTTP, validating rows through `market-catalog`, and writing them with
//! `market-db`.

pub mod fetch;
pub mod load;
pub mod progress;

pub use fetch::{FetchError, INDEX_TIMEOUT, fetch_index, index_client};
pub use load::{CatalogReport, CatalogStatus, LoadError, LoadStats, load_cabinets};
pub use progress::{LoadProgress, LogProgress, SilentProgress};
