use market_db::schema::create_schema;
use market_db::{SchemaError, open_database, open_existing, open_memory};
use tempfile::TempDir;

#[test]
fn schema_is_idempotent() {
    let conn = open_memory().unwrap();
    // Creating again should not error
    create_schema(&conn).unwrap();
}

#[test]
fn foreign_keys_enabled() {
    let conn = open_memory().unwrap();
    let fk: i32 = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(fk, 1);
}

#[test]
fn all_tables_exist() {
    let conn = open_memory().unwrap();
    for table in ["Catalog", "Cabinet", "BuildInfo"] {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "table '{}' should exist", table);
    }
}

#[test]
fn cabinet_indexes_exist() {
    let conn = open_memory().unwrap();
    for index in ["idx_cabinet_name", "idx_cabinet_creator"] {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='index' AND name=?1)",
                [index],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "index '{}' should exist", index);
    }
}

#[test]
fn open_database_creates_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("data").join("nested").join("marketplace.db");
    open_database(&path).unwrap();
    assert!(path.is_file());

    // Reopening an existing database keeps working.
    open_database(&path).unwrap();
    open_existing(&path).unwrap();
}

#[test]
fn open_existing_refuses_missing_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("missing.db");
    let err = open_existing(&path).unwrap_err();
    assert!(matches!(err, SchemaError::Missing(_)));
    assert!(!path.exists());
}
