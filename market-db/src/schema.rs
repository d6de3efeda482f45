//! SQLite schema creation.

use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Could not create directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
    #[error("Database file '{0}' not found; run create-db first")]
    Missing(String),
}

/// Create all tables and indexes if they don't exist.
///
/// This is idempotent; safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Open or create a marketplace database at the given path and make sure
/// the schema exists. Missing parent directories are created.
pub fn open_database(path: &Path) -> Result<Connection, SchemaError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| SchemaError::CreateDir {
                path: parent.display().to_string(),
                source: e,
            })?;
            log::info!("Created directory: {}", parent.display());
        }
    }

    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Open a database that `open_database` created earlier.
///
/// Loaders use this so that a mistyped path fails loudly instead of
/// silently creating an empty database.
pub fn open_existing(path: &Path) -> Result<Connection, SchemaError> {
    if !path.is_file() {
        return Err(SchemaError::Missing(path.display().to_string()));
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

const SCHEMA_SQL: &str = r#"
-- Catalog sources
CREATE TABLE IF NOT EXISTS Catalog (
    CatalogName TEXT PRIMARY KEY NOT NULL,
    Description TEXT,
    url TEXT
);

-- Marketplace items, one set per catalog
CREATE TABLE IF NOT EXISTS Cabinet (
    CatalogName TEXT NOT NULL,
    Name TEXT NOT NULL,
    Game TEXT NOT NULL,
    CreationDate TEXT,
    Version TEXT,
    RomName TEXT,
    Url TEXT NOT NULL,
    Description TEXT,
    Core TEXT,
    Creator TEXT,
    Notes TEXT,
    PRIMARY KEY (CatalogName, Name),
    FOREIGN KEY (CatalogName) REFERENCES Catalog(CatalogName) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_cabinet_name ON Cabinet (Name);
CREATE INDEX IF NOT EXISTS idx_cabinet_creator ON Cabinet (Creator);

-- Single-row build stamp, replaced on every release
CREATE TABLE IF NOT EXISTS BuildInfo (
    BuildTag TEXT NOT NULL,
    BuildCommitSHA TEXT NOT NULL,
    BuildTimestampUTC TEXT NOT NULL
);
"#;
