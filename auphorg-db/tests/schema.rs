use auphorg_db::schema::{CURRENT_VERSION, create_schema, get_schema_version};
use auphorg_db::{SchemaError, open_database, open_memory};
use tempfile::TempDir;

#[test]
fn create_schema_in_memory() {
    let conn = open_memory().unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn schema_is_idempotent() {
    let conn = open_memory().unwrap();
    create_schema(&conn).unwrap();
    create_schema(&conn).unwrap();

    let rows: i32 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
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
fn all_tables_and_views_exist() {
    let conn = open_memory().unwrap();
    let objects = [
        ("table", "schema_version"),
        ("table", "tags"),
        ("table", "files"),
        ("table", "item_entries"),
        ("table", "other_files"),
        ("view", "items"),
        ("view", "items_extra_files"),
    ];
    for (kind, name) in objects {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type=?1 AND name=?2)",
                [kind, name],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "{} '{}' should exist", kind, name);
    }
}

#[test]
fn open_database_on_disk_uses_wal() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");

    let conn = open_database(&path).unwrap();
    let mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
    drop(conn);

    // Reopening an existing catalog keeps its version.
    let conn = open_database(&path).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn newer_catalog_is_refused() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");

    let conn = open_database(&path).unwrap();
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [CURRENT_VERSION + 1],
    )
    .unwrap();
    drop(conn);

    match open_database(&path) {
        Err(SchemaError::VersionMismatch { expected, found }) => {
            assert_eq!(expected, CURRENT_VERSION);
            assert_eq!(found, CURRENT_VERSION + 1);
        }
        other => panic!("expected VersionMismatch, got {:?}", other.map(|_| ())),
    }
}
