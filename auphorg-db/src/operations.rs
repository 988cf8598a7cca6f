//! Mutating catalog operations: files, tags, items and extra-file links.
//!
//! Every operation commits before returning. Read-before-write sequences run
//! inside a per-call transaction.

use auphorg_catalog::types::*;
use rusqlite::Connection;
use thiserror::Error;

use crate::columns::{ExtraFileColumn, FileColumn, Insert, ItemColumn, TagsColumn, Update};
use crate::queries::{find_file_id, find_item};

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Duplicate {entity}: {field} '{value}' already exists")]
    DuplicateKey {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("File '{path}' is not catalogued (needed by item '{item}')")]
    MissingFile { path: String, item: String },
    #[error("Item '{name}' does not exist (needed by file '{path}')")]
    MissingItem { name: String, path: String },
    #[error("File '{path}' is not catalogued")]
    UnknownFile { path: String },
    #[error("File '{path}' has no metadata")]
    MissingMetadata { path: String },
    #[error("Item '{name}' already exists")]
    ItemAlreadyExists { name: String },
    #[error("Item '{item}' already has a content file; cannot assign '{path}'")]
    ContentAlreadyAssigned { path: String, item: String },
    #[error("Item '{item}' already has a tags file; cannot assign '{path}'")]
    TagsAlreadyAssigned { path: String, item: String },
}

impl OperationError {
    /// Whether this error means the item's role slot is already taken.
    pub fn is_role_taken(&self) -> bool {
        matches!(
            self,
            Self::ContentAlreadyAssigned { .. } | Self::TagsAlreadyAssigned { .. }
        )
    }
}

/// Map a UNIQUE constraint failure to `DuplicateKey`; pass anything else on.
fn unique_violation(
    err: rusqlite::Error,
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> OperationError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            OperationError::DuplicateKey {
                entity,
                field,
                value: value.to_string(),
            }
        }
        other => OperationError::Sqlite(other),
    }
}

// ── File Operations ─────────────────────────────────────────────────────────

/// Insert a file without metadata. Returns the new file id.
///
/// Re-inserting a known path is a conflict, never an update.
pub fn insert_file(conn: &Connection, file: &NewFile) -> Result<i64, OperationError> {
    insert_file_row(conn, file, None)
}

fn insert_file_row(
    conn: &Connection,
    file: &NewFile,
    tags_id: Option<i64>,
) -> Result<i64, OperationError> {
    Insert::new()
        .value(FileColumn::Path, file.path.clone())
        .value(FileColumn::ModifiedTime, file.modified_time.clone())
        .value(FileColumn::SizeBytes, file.size_bytes)
        .value(FileColumn::FileDigest, file.file_digest.clone())
        .value(FileColumn::ContentDigest, file.content_digest.clone())
        .value(FileColumn::Tags, tags_id)
        .execute_returning_id(conn)
        .map_err(|e| unique_violation(e, "file", "path", &file.path))
}

/// Insert a tags row. Returns the new tags id.
pub fn insert_tags(conn: &Connection, tags: &TagsRecord) -> Result<i64, OperationError> {
    let insert = TagsColumn::VALUES
        .iter()
        .zip(tags.values())
        .fold(Insert::new(), |insert, (column, value)| {
            insert.value(*column, value.clone())
        });
    Ok(insert.execute_returning_id(conn)?)
}

/// Insert a file together with its metadata. Returns the new file id.
///
/// Both rows are written in one transaction, so a duplicate path leaves no
/// orphaned tags row behind.
pub fn insert_rich_file(
    conn: &Connection,
    file: &NewFile,
    tags: &TagsRecord,
) -> Result<i64, OperationError> {
    let tx = conn.unchecked_transaction()?;
    let tags_id = insert_tags(&tx, tags)?;
    let file_id = insert_file_row(&tx, file, Some(tags_id))?;
    tx.commit()?;
    Ok(file_id)
}

// ── Item Operations ─────────────────────────────────────────────────────────

/// Create an item with no files attached.
///
/// Returns `true` if the item was created. An existing item is left alone
/// when `force` is false and is an error when `force` is true.
pub fn create_item(conn: &Connection, name: &str, force: bool) -> Result<bool, OperationError> {
    let inserted = Insert::new()
        .value(ItemColumn::Name, name.to_string())
        .or_ignore()
        .execute(conn)?;

    if inserted > 0 {
        return Ok(true);
    }
    if force {
        return Err(OperationError::ItemAlreadyExists {
            name: name.to_string(),
        });
    }
    Ok(false)
}

/// Resolve the file id and item for an attach/link call.
fn resolve(
    conn: &Connection,
    name: &str,
    path: &str,
) -> Result<(i64, ItemRecord), OperationError> {
    let file_id = find_file_id(conn, path)?.ok_or_else(|| OperationError::MissingFile {
        path: path.to_string(),
        item: name.to_string(),
    })?;
    let item = find_item(conn, name)?.ok_or_else(|| OperationError::MissingItem {
        name: name.to_string(),
        path: path.to_string(),
    })?;
    Ok((file_id, item))
}

/// Make `path` the content file of item `name`.
///
/// Re-attaching the current content file is a no-op. A content path that
/// only defaults from the tags file does not count as assigned.
pub fn attach_content(conn: &Connection, name: &str, path: &str) -> Result<(), OperationError> {
    let tx = conn.unchecked_transaction()?;
    let (file_id, item) = resolve(&tx, name, path)?;

    match item.content_file {
        Some(current) if current == file_id => return Ok(()),
        Some(_) => {
            return Err(OperationError::ContentAlreadyAssigned {
                path: path.to_string(),
                item: name.to_string(),
            });
        }
        None => {}
    }

    Update::by(ItemColumn::Id, item.id)
        .set(ItemColumn::ContentFile, file_id)
        .execute(&tx)
        .map_err(|e| unique_violation(e, "item", "content_file", path))?;
    tx.commit()?;
    Ok(())
}

/// Make `path` the tags file of item `name`.
///
/// Any existing tags file, even the same one, is a conflict.
pub fn attach_tags(conn: &Connection, name: &str, path: &str) -> Result<(), OperationError> {
    let tx = conn.unchecked_transaction()?;
    let (file_id, item) = resolve(&tx, name, path)?;

    if item.tags_file.is_some() {
        return Err(OperationError::TagsAlreadyAssigned {
            path: path.to_string(),
            item: name.to_string(),
        });
    }

    Update::by(ItemColumn::Id, item.id)
        .set(ItemColumn::TagsFile, file_id)
        .execute(&tx)
        .map_err(|e| unique_violation(e, "item", "tags_file", path))?;
    tx.commit()?;
    Ok(())
}

// ── Extra File Operations ───────────────────────────────────────────────────

/// Link `path` to item `name` as an extra file. Returns the link id.
///
/// Links keep their insertion order. A file can be an extra of one item
/// only.
pub fn link_extra_file(conn: &Connection, path: &str, name: &str) -> Result<i64, OperationError> {
    let tx = conn.unchecked_transaction()?;
    let (file_id, item) = resolve(&tx, name, path)?;

    let link_id = Insert::new()
        .value(ExtraFileColumn::File, file_id)
        .value(ExtraFileColumn::Item, item.id)
        .execute_returning_id(&tx)
        .map_err(|e| unique_violation(e, "other_file", "file", path))?;
    tx.commit()?;
    Ok(link_id)
}
