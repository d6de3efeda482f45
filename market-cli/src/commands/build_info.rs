use std::path::Path;

use market_catalog::BuildInfo;

use crate::CliError;

use super::open_existing_db;

/// Replace the database's build stamp.
pub(crate) fn run_build_info(
    db_path: &Path,
    tag: &str,
    commit_sha: &str,
    timestamp: &str,
) -> Result<(), CliError> {
    let build_tag = market_catalog::major_version(tag).map_err(|e| CliError::config(e.to_string()))?;
    let info = BuildInfo {
        build_tag,
        commit_sha: commit_sha.to_string(),
        timestamp_utc: timestamp.to_string(),
    };

    log::info!("Updating build info in {}", db_path.display());
    log::info!("  Tag:        {} (from {})", info.build_tag, tag);
    log::info!("  Commit SHA: {}", info.commit_sha);
    log::info!("  Timestamp:  {}", info.timestamp_utc);
    if !info.has_rfc3339_timestamp() {
        log::warn!(
            "Timestamp '{}' is not RFC 3339; storing it as given",
            info.timestamp_utc
        );
    }

    let conn = open_existing_db(db_path)?;
    market_db::write_build_info(&conn, &info)
        .map_err(|e| CliError::database(format!("Failed to update BuildInfo: {}", e)))?;
    log::info!("Build info updated.");

    Ok(())
}
