use std::path::Path;

use crate::CliError;

use super::log_heading;

/// Create the marketplace schema, or verify it on an existing database.
pub(crate) fn run_create_db(db_path: &Path) -> Result<(), CliError> {
    let existed = db_path.exists();
    log::info!("Initializing database structure at {}", db_path.display());

    let conn = market_db::open_database(db_path)
        .map_err(|e| CliError::database(format!("Failed to initialize database: {}", e)))?;
    let stats = market_db::market_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query database: {}", e)))?;

    crate::log_blank();
    log_heading(if existed {
        "Database structure verified"
    } else {
        "Database created"
    });
    log::info!("  Catalogs:       {:>8}", stats.catalogs);
    log::info!("  Cabinets:       {:>8}", stats.cabinets);
    log::info!("  Creators:       {:>8}", stats.creators);

    Ok(())
}
