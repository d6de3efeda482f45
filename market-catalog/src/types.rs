//! Data model types for the marketplace catalog.
//!
//! These types mirror the persistent schema: catalogs (loaded from YAML),
//! cabinets (loaded from per-catalog index files), and build metadata.

use serde::{Deserialize, Serialize};

// ── Catalog ─────────────────────────────────────────────────────────────────

/// One entry of the `marketplace` list in the catalog config.
///
/// `CatalogName` is the primary key in the database but is optional here so
/// that a nameless entry can be reported and skipped instead of failing the
/// whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "CatalogName", default)]
    pub catalog_name: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Url", default)]
    pub url: Option<String>,
}

impl CatalogEntry {
    /// The catalog name, if present and not blank.
    pub fn name(&self) -> Option<&str> {
        self.catalog_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// A catalog row as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
}

// ── Cabinet ─────────────────────────────────────────────────────────────────

/// One marketplace item, parsed from a catalog's index file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cabinet {
    pub catalog_name: String,
    pub name: String,
    pub game: String,
    pub url: String,
    pub creation_date: Option<String>,
    pub version: Option<String>,
    pub rom_name: Option<String>,
    pub description: Option<String>,
    pub core: Option<String>,
    pub creator: Option<String>,
    pub notes: Option<String>,
}

// ── Build info ──────────────────────────────────────────────────────────────

/// Build metadata stamped into the database by the release pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Major version only (e.g. "2" for tag "v2.3.1").
    pub build_tag: String,
    pub commit_sha: String,
    pub timestamp_utc: String,
}

impl BuildInfo {
    /// Whether the timestamp parses as RFC 3339 (the format CI emits).
    pub fn has_rfc3339_timestamp(&self) -> bool {
        chrono::DateTime::parse_from_rfc3339(&self.timestamp_utc).is_ok()
    }
}
