//! Read-only queries against the marketplace database.

use market_catalog::types::{BuildInfo, Cabinet, Catalog};
use rusqlite::{Connection, OptionalExtension, params};

use crate::operations::OperationError;

/// Summary counts for the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketStats {
    pub catalogs: i64,
    pub cabinets: i64,
    pub creators: i64,
}

/// All catalogs, ordered by name.
pub fn list_catalogs(conn: &Connection) -> Result<Vec<Catalog>, OperationError> {
    let mut stmt =
        conn.prepare("SELECT CatalogName, Description, url FROM Catalog ORDER BY CatalogName")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Catalog {
                name: row.get(0)?,
                description: row.get(1)?,
                url: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// All cabinets of one catalog, ordered by name.
pub fn cabinets_for_catalog(
    conn: &Connection,
    catalog_name: &str,
) -> Result<Vec<Cabinet>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT CatalogName, Name, Game, Url, CreationDate, Version, RomName,
                Description, Core, Creator, Notes
         FROM Cabinet WHERE CatalogName = ?1 ORDER BY Name",
    )?;
    let rows = stmt
        .query_map(params![catalog_name], |row| {
            Ok(Cabinet {
                catalog_name: row.get(0)?,
                name: row.get(1)?,
                game: row.get(2)?,
                url: row.get(3)?,
                creation_date: row.get(4)?,
                version: row.get(5)?,
                rom_name: row.get(6)?,
                description: row.get(7)?,
                core: row.get(8)?,
                creator: row.get(9)?,
                notes: row.get(10)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// The current build stamp, if one was written.
pub fn read_build_info(conn: &Connection) -> Result<Option<BuildInfo>, OperationError> {
    let info = conn
        .query_row(
            "SELECT BuildTag, BuildCommitSHA, BuildTimestampUTC FROM BuildInfo LIMIT 1",
            [],
            |row| {
                Ok(BuildInfo {
                    build_tag: row.get(0)?,
                    commit_sha: row.get(1)?,
                    timestamp_utc: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(info)
}

/// Row counts across the marketplace tables.
pub fn market_stats(conn: &Connection) -> Result<MarketStats, OperationError> {
    let count = |sql: &str| -> Result<i64, rusqlite::Error> {
        conn.query_row(sql, [], |row| row.get(0))
    };
    Ok(MarketStats {
        catalogs: count("SELECT COUNT(*) FROM Catalog")?,
        cabinets: count("SELECT COUNT(*) FROM Cabinet")?,
        creators: count("SELECT COUNT(DISTINCT Creator) FROM Cabinet WHERE Creator IS NOT NULL")?,
    })
}
