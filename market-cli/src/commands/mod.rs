pub(crate) mod build_info;
pub(crate) mod create_db;
pub(crate) mod credentials;
pub(crate) mod export;
pub(crate) mod load_cabinets;
pub(crate) mod load_catalogs;

use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use rusqlite::Connection;

use crate::CliError;

/// Open a database created earlier by `create-db`.
pub(crate) fn open_existing_db(db_path: &Path) -> Result<Connection, CliError> {
    let conn = market_db::open_existing(db_path)
        .map_err(|e| CliError::database(format!("Failed to open {}: {}", db_path.display(), e)))?;
    log::debug!("Opened database {}", db_path.display());
    Ok(conn)
}

/// Log a bold section heading.
pub(crate) fn log_heading(title: &str) {
    log::info!("{}", title.if_supports_color(Stdout, |t| t.bold()));
}
