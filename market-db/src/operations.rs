//! Write operations for catalogs, cabinets, and build info.

use std::collections::HashSet;

use market_catalog::types::*;
use rusqlite::{Connection, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to insert catalog '{name}': {source}")]
    CatalogInsert {
        name: String,
        source: rusqlite::Error,
    },
}

// ── Catalog Operations ──────────────────────────────────────────────────────

/// Counters from [`replace_catalogs`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogLoadStats {
    pub deleted: usize,
    pub inserted: usize,
    pub skipped_missing_name: usize,
    pub skipped_duplicate: usize,
}

/// Replace every catalog with the given entries.
///
/// Runs in a single transaction: existing rows are deleted (cascading to
/// their cabinets), then entries are inserted in order. Entries without a
/// name and repeats of an earlier name are skipped. Any SQLite error rolls
/// the whole load back.
pub fn replace_catalogs(
    conn: &Connection,
    entries: &[CatalogEntry],
) -> Result<CatalogLoadStats, OperationError> {
    let mut stats = CatalogLoadStats::default();
    let tx = conn.unchecked_transaction()?;

    stats.deleted = tx.execute("DELETE FROM Catalog", [])?;
    log::info!("Deleted {} existing catalog rows", stats.deleted);

    let mut seen: HashSet<&str> = HashSet::new();
    {
        let mut stmt =
            tx.prepare("INSERT INTO Catalog (CatalogName, Description, url) VALUES (?1, ?2, ?3)")?;

        for (i, entry) in entries.iter().enumerate() {
            let Some(name) = entry.name() else {
                log::warn!("Skipping entry {} due to missing 'CatalogName'", i + 1);
                stats.skipped_missing_name += 1;
                continue;
            };
            if !seen.insert(name) {
                log::warn!(
                    "Duplicate 'CatalogName' '{}'; skipping entry {}",
                    name,
                    i + 1
                );
                stats.skipped_duplicate += 1;
                continue;
            }

            stmt.execute(params![name, entry.description, entry.url])
                .map_err(|e| OperationError::CatalogInsert {
                    name: name.to_string(),
                    source: e,
                })?;
            stats.inserted += 1;
        }
    }

    tx.commit()?;
    Ok(stats)
}

// ── Cabinet Operations ──────────────────────────────────────────────────────

/// A cabinet the database refused, with the reason.
#[derive(Debug)]
pub struct CabinetInsertFailure {
    pub name: String,
    pub error: rusqlite::Error,
}

/// Counters from [`replace_cabinets`].
#[derive(Debug, Default)]
pub struct CabinetWriteStats {
    pub deleted: usize,
    pub inserted: usize,
    pub failed: Vec<CabinetInsertFailure>,
}

/// Insert one cabinet.
pub fn insert_cabinet(conn: &Connection, cabinet: &Cabinet) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO Cabinet (CatalogName, Name, Game, CreationDate, Version, RomName,
             Url, Description, Core, Creator, Notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            cabinet.catalog_name,
            cabinet.name,
            cabinet.game,
            cabinet.creation_date,
            cabinet.version,
            cabinet.rom_name,
            cabinet.url,
            cabinet.description,
            cabinet.core,
            cabinet.creator,
            cabinet.notes,
        ],
    )?;
    Ok(())
}

/// Replace a catalog's cabinets with a freshly parsed set.
///
/// One transaction per catalog. A cabinet that violates a constraint is
/// recorded in [`CabinetWriteStats::failed`] and the rest still commit.
pub fn replace_cabinets(
    conn: &Connection,
    catalog_name: &str,
    cabinets: &[Cabinet],
) -> Result<CabinetWriteStats, OperationError> {
    let mut stats = CabinetWriteStats::default();
    let tx = conn.unchecked_transaction()?;

    stats.deleted = tx.execute(
        "DELETE FROM Cabinet WHERE CatalogName = ?1",
        params![catalog_name],
    )?;

    for cabinet in cabinets {
        match insert_cabinet(&tx, cabinet) {
            Ok(()) => stats.inserted += 1,
            Err(OperationError::Sqlite(e)) => stats.failed.push(CabinetInsertFailure {
                name: cabinet.name.clone(),
                error: e,
            }),
            Err(e) => return Err(e),
        }
    }

    tx.commit()?;
    Ok(stats)
}

// ── Build Info Operations ───────────────────────────────────────────────────

/// Replace the build stamp. The table holds at most one row.
pub fn write_build_info(conn: &Connection, info: &BuildInfo) -> Result<(), OperationError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM BuildInfo", [])?;
    tx.execute(
        "INSERT INTO BuildInfo (BuildTag, BuildCommitSHA, BuildTimestampUTC) VALUES (?1, ?2, ?3)",
        params![info.build_tag, info.commit_sha, info.timestamp_utc],
    )?;
    tx.commit()?;
    Ok(())
}
