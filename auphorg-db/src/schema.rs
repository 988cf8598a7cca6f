//! SQLite schema creation and versioning.

use std::time::Duration;

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Migration error: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 1;

/// How long a connection waits on a locked database before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Create all tables, indexes and views if they don't exist.
///
/// Idempotent: safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    if get_schema_version(conn)? < CURRENT_VERSION {
        set_schema_version(conn, CURRENT_VERSION)?;
    }
    Ok(())
}

/// Open or create a catalog database at the given path.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        create_schema(&conn)?;
    } else if version != CURRENT_VERSION {
        migrate(&conn, version)?;
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Bring an older catalog up to `CURRENT_VERSION`.
///
/// A catalog written by a newer build is refused.
fn migrate(conn: &Connection, from_version: i32) -> Result<(), SchemaError> {
    if from_version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: from_version,
        });
    }

    // No migrations exist yet; re-running the idempotent DDL covers any
    // objects added since `from_version`.
    create_schema(conn)
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Decoded metadata of rich files
CREATE TABLE IF NOT EXISTS tags (
    tags_id INTEGER PRIMARY KEY,
    model TEXT,
    software TEXT,
    date_time_original TEXT,
    create_date TEXT,
    image_width TEXT,
    image_height TEXT,
    tags_list TEXT,
    hierarchical_subject TEXT,
    subject TEXT,
    keywords TEXT
);

-- Physical files
CREATE TABLE IF NOT EXISTS files (
    file_id INTEGER PRIMARY KEY,
    path TEXT NOT NULL UNIQUE,
    modified_time TEXT NOT NULL,
    size_bytes INTEGER NOT NULL,
    file_digest TEXT NOT NULL,
    content_digest TEXT,
    tags INTEGER UNIQUE REFERENCES tags(tags_id)
);
CREATE INDEX IF NOT EXISTS idx_files_file_digest ON files(file_digest);
CREATE INDEX IF NOT EXISTS idx_files_content_digest ON files(content_digest);

-- Logical items
CREATE TABLE IF NOT EXISTS item_entries (
    item_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    content_file INTEGER UNIQUE REFERENCES files(file_id),
    tags_file INTEGER UNIQUE REFERENCES files(file_id)
);

-- Extra files linked to an item, in link order
CREATE TABLE IF NOT EXISTS other_files (
    link_id INTEGER PRIMARY KEY AUTOINCREMENT,
    file INTEGER NOT NULL UNIQUE REFERENCES files(file_id),
    item INTEGER NOT NULL REFERENCES item_entries(item_id)
);
CREATE INDEX IF NOT EXISTS idx_other_files_item ON other_files(item);

-- Items with their file references resolved to paths
CREATE VIEW IF NOT EXISTS items AS
SELECT
    i.item_id,
    i.name,
    COALESCE(c.path, t.path) AS content_path,
    t.path AS tags_path
FROM item_entries i
LEFT JOIN files c ON c.file_id = i.content_file
LEFT JOIN files t ON t.file_id = i.tags_file;

-- Extra-file paths per item, '|'-joined in link order
CREATE VIEW IF NOT EXISTS items_extra_files AS
SELECT
    i.item_id,
    i.name,
    group_concat(f.path, '|' ORDER BY o.link_id) AS extra_paths
FROM item_entries i
JOIN other_files o ON o.item = i.item_id
JOIN files f ON f.file_id = o.file
GROUP BY i.item_id, i.name;
"#;
