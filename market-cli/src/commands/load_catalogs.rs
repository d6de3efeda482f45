use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::{log_heading, open_existing_db};

/// Replace the Catalog table with the `marketplace` list of a YAML file.
pub(crate) fn run_load_catalogs(db_path: &Path, yaml_path: &Path) -> Result<(), CliError> {
    log::info!(
        "Loading catalogs from {} into {}",
        yaml_path.display().if_supports_color(Stdout, |t| t.cyan()),
        db_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "{}",
        "Existing catalogs (and their cabinets) will be replaced."
            .if_supports_color(Stdout, |t| t.dimmed()),
    );

    let conn = open_existing_db(db_path)?;
    let entries = market_catalog::load_marketplace(yaml_path)
        .map_err(|e| CliError::config(e.to_string()))?;
    log::info!("Read {} catalog entries from YAML", entries.len());

    let stats = market_db::replace_catalogs(&conn, &entries)
        .map_err(|e| CliError::database(format!("Catalog load rolled back: {}", e)))?;

    crate::log_blank();
    log_heading("Catalog Load Summary");
    log::info!("  Deleted:        {:>8}", stats.deleted);
    log::info!("  Inserted:       {:>8}", stats.inserted);
    if stats.skipped_missing_name > 0 {
        log::info!(
            "  No name:        {:>8}",
            stats
                .skipped_missing_name
                .if_supports_color(Stdout, |t| t.yellow()),
        );
    }
    if stats.skipped_duplicate > 0 {
        log::info!(
            "  Duplicates:     {:>8}",
            stats
                .skipped_duplicate
                .if_supports_color(Stdout, |t| t.yellow()),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_yaml_into_created_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("market.db");
        let yaml = dir.path().join("marketplace.yaml");
        std::fs::write(
            &yaml,
            "marketplace:\n  - CatalogName: Arcade\n    Description: Classics\n    Url: https://example.com/a.csv\n  - CatalogName: Arcade\n",
        )
        .unwrap();
        market_db::open_database(&db).unwrap();

        run_load_catalogs(&db, &yaml).unwrap();

        let conn = market_db::open_existing(&db).unwrap();
        let catalogs = market_db::list_catalogs(&conn).unwrap();
        assert_eq!(catalogs.len(), 1);
        assert_eq!(catalogs[0].name, "Arcade");
    }

    #[test]
    fn missing_database_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("marketplace.yaml");
        std::fs::write(&yaml, "marketplace: []\n").unwrap();
        let err = run_load_catalogs(&dir.path().join("absent.db"), &yaml).unwrap_err();
        assert!(matches!(err, CliError::Database(_)));
    }

    #[test]
    fn yaml_without_marketplace_key_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("market.db");
        let yaml = dir.path().join("bad.yaml");
        std::fs::write(&yaml, "catalogs: []\n").unwrap();
        market_db::open_database(&db).unwrap();
        let err = run_load_catalogs(&db, &yaml).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
