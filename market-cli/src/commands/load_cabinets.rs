use std::path::Path;

use market_import::{CatalogStatus, LoadProgress};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::{log_heading, open_existing_db};

/// Colored per-catalog progress lines.
struct CliProgress;

impl LoadProgress for CliProgress {
    fn on_catalog_start(&self, current: usize, total: usize, name: &str, url: Option<&str>) {
        crate::log_blank();
        log::info!(
            "[{}/{}] {}",
            current,
            total,
            name.if_supports_color(Stdout, |t| t.bold()),
        );
        if let Some(url) = url {
            log::info!("  URL: {}", url.if_supports_color(Stdout, |t| t.cyan()));
        }
    }

    fn on_catalog_done(&self, name: &str, status: &CatalogStatus) {
        match status {
            CatalogStatus::Loaded(report) => {
                log::info!(
                    "  {} {} rows, {} inserted, {} rejected",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    report.rows,
                    report.inserted,
                    report.rejected,
                );
                if report.replaced > 0 {
                    log::debug!("  Replaced {} cabinets from a previous load", report.replaced);
                }
            }
            other => log::warn!(
                "{} Catalog '{}': {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                name,
                other,
            ),
        }
    }
}

/// Fetch every catalog's cabinet index and load its rows.
pub(crate) fn run_load_cabinets(db_path: &Path) -> Result<(), CliError> {
    log::info!(
        "Loading cabinets into {}",
        db_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    let conn = open_existing_db(db_path)?;
    let client = market_import::index_client()
        .map_err(|e| CliError::http(format!("Failed to build HTTP client: {}", e)))?;

    let stats = market_import::load_cabinets(&conn, &client, Some(&CliProgress))
        .map_err(|e| CliError::database(e.to_string()))?;

    if stats.catalogs_found == 0 {
        log::info!(
            "{}",
            "No catalogs found; run load-catalogs first.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }

    crate::log_blank();
    log_heading("Cabinet Load Summary");
    log::info!("  Catalogs:       {:>8}", stats.catalogs_found);
    log::info!("  Loaded:         {:>8}", stats.catalogs_loaded);
    let skipped = [
        ("  No URL:         ", stats.catalogs_missing_url),
        ("  Download fail:  ", stats.catalogs_failed_download),
        ("  Empty index:    ", stats.catalogs_empty),
        ("  Parse fail:     ", stats.catalogs_parse_failed),
    ];
    for (label, count) in skipped {
        if count > 0 {
            log::info!("{}{:>8}", label, count.if_supports_color(Stdout, |t| t.yellow()));
        }
    }
    crate::log_blank();
    log::info!("  Rows read:      {:>8}", stats.rows);
    log::info!("  Inserted:       {:>8}", stats.inserted);
    log::info!("  Rejected:       {:>8}", stats.rejected);

    Ok(())
}
