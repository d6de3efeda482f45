//! Marketplace catalog data model, YAML config loading, and index parsing.
//!
//! This crate defines the catalog data model without any database or network
//! dependencies. `market-db` persists these types; `market-import` feeds
//! downloaded index files through [`parse_cabinet_index`].

pub mod index;
pub mod types;
pub mod version;
pub mod yaml;

pub use index::{IndexError, ParsedIndex, RejectReason, RejectedRow, parse_cabinet_index};
pub use types::*;
pub use version::{TagError, major_version};
pub use yaml::{YamlError, load_marketplace, parse_marketplace};
