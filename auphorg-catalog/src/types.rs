//! Data model types for the media catalog.
//!
//! These types represent the persistent catalog schema: files, decoded
//! metadata (tags), logical items, and the derived item summary.

use serde::Serialize;

use auphorg_core::TagMap;

// ── File ────────────────────────────────────────────────────────────────────

/// A file measured by the ingestor, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFile {
    pub path: String,
    /// RFC 3339, UTC
    pub modified_time: String,
    pub size_bytes: i64,
    /// SHA-512 hex of the raw bytes
    pub file_digest: String,
    /// Hash of the decoded content; format-specific
    pub content_digest: Option<String>,
}

/// A catalogued file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub id: i64,
    pub path: String,
    pub modified_time: String,
    pub size_bytes: i64,
    pub file_digest: String,
    pub content_digest: Option<String>,
    /// Set only for rich files.
    pub tags_id: Option<i64>,
}

impl FileRecord {
    pub fn is_rich(&self) -> bool {
        self.tags_id.is_some()
    }
}

// ── Tags ────────────────────────────────────────────────────────────────────

/// Metadata tag names stored in the `tags` table, in column order.
pub const TAG_NAMES: [&str; 10] = [
    "Model",
    "Software",
    "DateTimeOriginal",
    "CreateDate",
    "ImageWidth",
    "ImageHeight",
    "TagsList",
    "HierarchicalSubject",
    "Subject",
    "Keywords",
];

/// Decoded metadata for one rich file.
///
/// Tags missing from the extracted map are `None` (NULL in the store).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagsRecord {
    pub model: Option<String>,
    pub software: Option<String>,
    pub date_time_original: Option<String>,
    pub create_date: Option<String>,
    pub image_width: Option<String>,
    pub image_height: Option<String>,
    pub tags_list: Option<String>,
    pub hierarchical_subject: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
}

impl TagsRecord {
    /// Pick the known tags out of an extracted map; anything else is dropped.
    pub fn from_tag_map(map: &TagMap) -> Self {
        let get = |name: &str| map.get(name).cloned();
        Self {
            model: get("Model"),
            software: get("Software"),
            date_time_original: get("DateTimeOriginal"),
            create_date: get("CreateDate"),
            image_width: get("ImageWidth"),
            image_height: get("ImageHeight"),
            tags_list: get("TagsList"),
            hierarchical_subject: get("HierarchicalSubject"),
            subject: get("Subject"),
            keywords: get("Keywords"),
        }
    }

    /// Values in [`TAG_NAMES`] order.
    pub fn values(&self) -> [&Option<String>; 10] {
        [
            &self.model,
            &self.software,
            &self.date_time_original,
            &self.create_date,
            &self.image_width,
            &self.image_height,
            &self.tags_list,
            &self.hierarchical_subject,
            &self.subject,
            &self.keywords,
        ]
    }

    /// Convert back to a tag map keyed by tag name, omitting unset tags.
    pub fn to_tag_map(&self) -> TagMap {
        TAG_NAMES
            .iter()
            .zip(self.values())
            .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values().iter().all(|v| v.is_none())
    }
}

// ── Item ────────────────────────────────────────────────────────────────────

/// A logical media entity: one shot or clip and its companion files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: i64,
    pub name: String,
    /// File id of the full-resolution content, if attached.
    pub content_file: Option<i64>,
    /// File id of the metadata-bearing file, if attached.
    pub tags_file: Option<i64>,
}

/// Read-only view of an item with every reference resolved to a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub name: String,
    /// Content file path; falls back to the tags file path when no content
    /// file is attached.
    pub content_path: Option<String>,
    pub tags_path: Option<String>,
    pub tags: Option<TagsRecord>,
    /// Extra-file paths in link order.
    pub extra_files: Vec<String>,
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Row counts across the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub files: i64,
    pub rich_files: i64,
    pub tags: i64,
    pub items: i64,
    pub items_with_content: i64,
    pub items_with_tags: i64,
    pub extra_links: i64,
}
