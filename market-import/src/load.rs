//! Load every catalog's cabinets into the database.
//!
//! Catalogs are processed one at a time. A catalog whose index cannot be
//! downloaded or parsed is reported and skipped; only database failures
//! abort the whole load.

use market_catalog::{IndexError, parse_cabinet_index};
use market_db::OperationError;
use rusqlite::Connection;
use thiserror::Error;

use crate::fetch::{FetchError, fetch_index};
use crate::progress::{LoadProgress, LogProgress};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
}

/// Per-catalog row counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogReport {
    pub rows: usize,
    pub inserted: usize,
    /// Rows refused by validation or by the database.
    pub rejected: usize,
    /// Cabinets from a previous load that were replaced.
    pub replaced: usize,
}

/// What happened to one catalog.
#[derive(Debug)]
pub enum CatalogStatus {
    Loaded(CatalogReport),
    MissingUrl,
    DownloadFailed(FetchError),
    EmptyIndex,
    ParseFailed(IndexError),
}

impl std::fmt::Display for CatalogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loaded(r) => write!(f, "loaded {} of {} rows", r.inserted, r.rows),
            Self::MissingUrl => write!(f, "skipped, missing or empty URL"),
            Self::DownloadFailed(e) => write!(f, "download failed: {e}"),
            Self::EmptyIndex => write!(f, "skipped, downloaded index is empty"),
            Self::ParseFailed(e) => write!(f, "index could not be parsed: {e}"),
        }
    }
}

/// Totals across a cabinet load.
#[derive(Debug, Default)]
pub struct LoadStats {
    pub catalogs_found: usize,
    pub catalogs_loaded: usize,
    pub catalogs_missing_url: usize,
    pub catalogs_failed_download: usize,
    pub catalogs_empty: usize,
    pub catalogs_parse_failed: usize,
    pub rows: usize,
    pub inserted: usize,
    pub rejected: usize,
    /// Outcome per catalog, in processing order.
    pub catalogs: Vec<(String, CatalogStatus)>,
}

impl LoadStats {
    fn record(&mut self, name: String, status: CatalogStatus) {
        match &status {
            CatalogStatus::Loaded(r) => {
                self.catalogs_loaded += 1;
                self.rows += r.rows;
                self.inserted += r.inserted;
                self.rejected += r.rejected;
            }
            CatalogStatus::MissingUrl => self.catalogs_missing_url += 1,
            CatalogStatus::DownloadFailed(_) => self.catalogs_failed_download += 1,
            CatalogStatus::EmptyIndex => self.catalogs_empty += 1,
            CatalogStatus::ParseFailed(_) => self.catalogs_parse_failed += 1,
        }
        self.catalogs.push((name, status));
    }
}

/// Download and load the index of every catalog in the database.
///
/// Without a progress reporter, progress goes to the log via [`LogProgress`].
pub fn load_cabinets(
    conn: &Connection,
    client: &reqwest::blocking::Client,
    progress: Option<&dyn LoadProgress>,
) -> Result<LoadStats, LoadError> {
    let catalogs = market_db::list_catalogs(conn)?;
    let mut stats = LoadStats {
        catalogs_found: catalogs.len(),
        ..Default::default()
    };

    if catalogs.is_empty() {
        log::info!("No catalogs found in the Catalog table to process.");
        return Ok(stats);
    }

    let progress = progress.unwrap_or(&LogProgress);
    let total = catalogs.len();
    for (i, catalog) in catalogs.into_iter().enumerate() {
        let url = catalog
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());

        progress.on_catalog_start(i + 1, total, &catalog.name, url);

        let status = match url {
            None => CatalogStatus::MissingUrl,
            Some(url) => load_catalog(conn, client, &catalog.name, url)?,
        };

        progress.on_catalog_done(&catalog.name, &status);
        stats.record(catalog.name, status);
    }

    Ok(stats)
}

/// Fetch, parse, and store one catalog's index.
fn load_catalog(
    conn: &Connection,
    client: &reqwest::blocking::Client,
    catalog_name: &str,
    url: &str,
) -> Result<CatalogStatus, LoadError> {
    let content = match fetch_index(client, url) {
        Ok(c) => c,
        Err(e) => return Ok(CatalogStatus::DownloadFailed(e)),
    };
    if content.trim().is_empty() {
        return Ok(CatalogStatus::EmptyIndex);
    }

    let parsed = match parse_cabinet_index(catalog_name, &content) {
        Ok(p) => p,
        Err(e) => return Ok(CatalogStatus::ParseFailed(e)),
    };

    for rejected in &parsed.rejected {
        log::warn!("  Skipping row {}: {}", rejected.row, rejected.reason);
    }

    let written = market_db::replace_cabinets(conn, catalog_name, &parsed.cabinets)?;
    for failure in &written.failed {
        log::warn!(
            "  DB error for Name '{}': {}. Skipping row.",
            failure.name,
            failure.error
        );
    }

    Ok(CatalogStatus::Loaded(CatalogReport {
        rows: parsed.rows,
        inserted: written.inserted,
        rejected: parsed.rejected.len() + written.failed.len(),
        replaced: written.deleted,
    }))
}
