//! Read-only catalog queries.

use auphorg_catalog::types::*;
use auphorg_core::TagMap;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::operations::OperationError;

// ── Lookups ─────────────────────────────────────────────────────────────────

/// Find a file's id by its path.
pub fn find_file_id(conn: &Connection, path: &str) -> Result<Option<i64>, OperationError> {
    let mut stmt = conn.prepare("SELECT file_id FROM files WHERE path = ?1")?;
    let result = stmt.query_row(params![path], |row| row.get::<_, i64>(0));
    match result {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Find an item by name.
pub fn find_item(conn: &Connection, name: &str) -> Result<Option<ItemRecord>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT item_id, name, content_file, tags_file FROM item_entries WHERE name = ?1",
    )?;
    let result = stmt.query_row(params![name], |row| {
        Ok(ItemRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            content_file: row.get(2)?,
            tags_file: row.get(3)?,
        })
    });
    match result {
        Ok(item) => Ok(Some(item)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Look up a catalogued file by path.
pub fn get_file(conn: &Connection, path: &str) -> Result<Option<FileRecord>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT file_id, path, modified_time, size_bytes, file_digest, content_digest, tags
         FROM files WHERE path = ?1",
    )?;
    let file = stmt
        .query_row(params![path], |row| {
            Ok(FileRecord {
                id: row.get(0)?,
                path: row.get(1)?,
                modified_time: row.get(2)?,
                size_bytes: row.get(3)?,
                file_digest: row.get(4)?,
                content_digest: row.get(5)?,
                tags_id: row.get(6)?,
            })
        })
        .optional()?;
    Ok(file)
}

fn tags_from_row(row: &Row) -> rusqlite::Result<TagsRecord> {
    Ok(TagsRecord {
        model: row.get(0)?,
        software: row.get(1)?,
        date_time_original: row.get(2)?,
        create_date: row.get(3)?,
        image_width: row.get(4)?,
        image_height: row.get(5)?,
        tags_list: row.get(6)?,
        hierarchical_subject: row.get(7)?,
        subject: row.get(8)?,
        keywords: row.get(9)?,
    })
}

/// Look up a tags row by id.
pub fn get_tags(conn: &Connection, tags_id: i64) -> Result<Option<TagsRecord>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT model, software, date_time_original, create_date, image_width, image_height,
                tags_list, hierarchical_subject, subject, keywords
         FROM tags WHERE tags_id = ?1",
    )?;
    Ok(stmt.query_row(params![tags_id], tags_from_row).optional()?)
}

// ── Item Summary ────────────────────────────────────────────────────────────

/// Build the summary of item `name`, or `None` if it does not exist.
///
/// Fails with `MissingMetadata` when the item has a tags file but no tags
/// row is reachable from it.
pub fn get_item(conn: &Connection, name: &str) -> Result<Option<ItemSummary>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT i.item_id, i.content_path, i.tags_path, f.tags
         FROM items i
         JOIN item_entries e ON e.item_id = i.item_id
         LEFT JOIN files f ON f.file_id = e.tags_file
         WHERE i.name = ?1",
    )?;
    let row = stmt
        .query_row(params![name], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<i64>>(3)?,
            ))
        })
        .optional()?;

    let Some((item_id, content_path, tags_path, tags_id)) = row else {
        return Ok(None);
    };

    let tags = match &tags_path {
        None => None,
        Some(path) => {
            let missing = || OperationError::MissingMetadata { path: path.clone() };
            let tags_id = tags_id.ok_or_else(missing)?;
            Some(get_tags(conn, tags_id)?.ok_or_else(missing)?)
        }
    };

    Ok(Some(ItemSummary {
        name: name.to_string(),
        content_path,
        tags_path,
        tags,
        extra_files: extra_file_paths(conn, item_id)?,
    }))
}

/// Extra-file paths of an item in link order.
pub fn extra_file_paths(conn: &Connection, item_id: i64) -> Result<Vec<String>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT f.path FROM other_files o
         JOIN files f ON f.file_id = o.file
         WHERE o.item = ?1
         ORDER BY o.link_id",
    )?;
    let paths = stmt
        .query_map(params![item_id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(paths)
}

/// Decoded metadata of a rich file, keyed by tag name.
///
/// Unset tags are omitted. Fails with `UnknownFile` for an uncatalogued
/// path and `MissingMetadata` for a file without tags.
pub fn get_rich_file_tags(conn: &Connection, path: &str) -> Result<TagMap, OperationError> {
    let file = get_file(conn, path)?.ok_or_else(|| OperationError::UnknownFile {
        path: path.to_string(),
    })?;
    let missing = || OperationError::MissingMetadata {
        path: path.to_string(),
    };
    let tags_id = file.tags_id.ok_or_else(missing)?;
    let tags = get_tags(conn, tags_id)?.ok_or_else(missing)?;
    Ok(tags.to_tag_map())
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Row counts across the catalog.
pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let count = |sql: &str| -> Result<i64, OperationError> {
        Ok(conn.query_row(sql, [], |r| r.get(0))?)
    };

    Ok(CatalogStats {
        files: count("SELECT COUNT(*) FROM files")?,
        rich_files: count("SELECT COUNT(*) FROM files WHERE tags IS NOT NULL")?,
        tags: count("SELECT COUNT(*) FROM tags")?,
        items: count("SELECT COUNT(*) FROM item_entries")?,
        items_with_content: count(
            "SELECT COUNT(*) FROM item_entries WHERE content_file IS NOT NULL",
        )?,
        items_with_tags: count("SELECT COUNT(*) FROM item_entries WHERE tags_file IS NOT NULL")?,
        extra_links: count("SELECT COUNT(*) FROM other_files")?,
    })
}
