//! Cabinet loading progress reporting.

use crate::load::CatalogStatus;

/// Trait for receiving cabinet loading progress updates.
pub trait LoadProgress {
    /// Called before a catalog's index is fetched.
    fn on_catalog_start(&self, current: usize, total: usize, name: &str, url: Option<&str>);

    /// Called once a catalog has been handled, successfully or not.
    fn on_catalog_done(&self, name: &str, status: &CatalogStatus);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl LoadProgress for SilentProgress {
    fn on_catalog_start(&self, _current: usize, _total: usize, _name: &str, _url: Option<&str>) {}
    fn on_catalog_done(&self, _name: &str, _status: &CatalogStatus) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl LoadProgress for LogProgress {
    fn on_catalog_start(&self, current: usize, total: usize, name: &str, url: Option<&str>) {
        log::info!("[{}/{}] Processing catalog '{}'", current, total, name);
        if let Some(url) = url {
            log::info!("  URL: {}", url);
        }
    }

    fn on_catalog_done(&self, name: &str, status: &CatalogStatus) {
        match status {
            CatalogStatus::Loaded(report) => log::info!(
                "  Finished '{}'. Rows: {}, inserted: {}, rejected: {}",
                name,
                report.rows,
                report.inserted,
                report.rejected
            ),
            other => log::warn!("  Catalog '{}': {}", name, other),
        }
    }
}
