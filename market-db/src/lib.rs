//! SQLite persistence layer for the marketplace catalog.
//!
//! Provides schema creation, write operations, and query APIs
//! backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    CabinetInsertFailure, CabinetWriteStats, CatalogLoadStats, OperationError, insert_cabinet,
    replace_cabinets, replace_catalogs, write_build_info,
};
pub use queries::{
    MarketStats, cabinets_for_catalog, list_catalogs, market_stats, read_build_info,
};
pub use schema::{SchemaError, open_database, open_existing, open_memory};
