//! Typed INSERT/UPDATE builders over closed sets of column names.
//!
//! SQL text is assembled only from the `'static` names of the column enums
//! below. Every value, including the key of an UPDATE, is bound as a
//! parameter.

use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};

/// A column of one catalog table.
pub trait Column: Copy {
    /// Table the column belongs to.
    const TABLE: &'static str;

    fn name(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileColumn {
    Id,
    Path,
    ModifiedTime,
    SizeBytes,
    FileDigest,
    ContentDigest,
    Tags,
}

impl Column for FileColumn {
    const TABLE: &'static str = "files";

    fn name(self) -> &'static str {
        match self {
            Self::Id => "file_id",
            Self::Path => "path",
            Self::ModifiedTime => "modified_time",
            Self::SizeBytes => "size_bytes",
            Self::FileDigest => "file_digest",
            Self::ContentDigest => "content_digest",
            Self::Tags => "tags",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagsColumn {
    Id,
    Model,
    Software,
    DateTimeOriginal,
    CreateDate,
    ImageWidth,
    ImageHeight,
    TagsList,
    HierarchicalSubject,
    Subject,
    Keywords,
}

impl TagsColumn {
    /// Value columns in the order of `auphorg_catalog::TAG_NAMES`.
    pub const VALUES: [TagsColumn; 10] = [
        Self::Model,
        Self::Software,
        Self::DateTimeOriginal,
        Self::CreateDate,
        Self::ImageWidth,
        Self::ImageHeight,
        Self::TagsList,
        Self::HierarchicalSubject,
        Self::Subject,
        Self::Keywords,
    ];
}

impl Column for TagsColumn {
    const TABLE: &'static str = "tags";

    fn name(self) -> &'static str {
        match self {
            Self::Id => "tags_id",
            Self::Model => "model",
            Self::Software => "software",
            Self::DateTimeOriginal => "date_time_original",
            Self::CreateDate => "create_date",
            Self::ImageWidth => "image_width",
            Self::ImageHeight => "image_height",
            Self::TagsList => "tags_list",
            Self::HierarchicalSubject => "hierarchical_subject",
            Self::Subject => "subject",
            Self::Keywords => "keywords",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemColumn {
    Id,
    Name,
    ContentFile,
    TagsFile,
}

impl Column for ItemColumn {
    const TABLE: &'static str = "item_entries";

    fn name(self) -> &'static str {
        match self {
            Self::Id => "item_id",
            Self::Name => "name",
            Self::ContentFile => "content_file",
            Self::TagsFile => "tags_file",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraFileColumn {
    File,
    Item,
}

impl Column for ExtraFileColumn {
    const TABLE: &'static str = "other_files";

    fn name(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Item => "item",
        }
    }
}

// ── Insert ──────────────────────────────────────────────────────────────────

/// `INSERT INTO <table> (...) VALUES (...)` with bound values.
#[derive(Debug, Clone)]
pub struct Insert<C: Column> {
    values: Vec<(C, Value)>,
    or_ignore: bool,
}

impl<C: Column> Insert<C> {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            or_ignore: false,
        }
    }

    pub fn value(mut self, column: C, value: impl Into<Value>) -> Self {
        self.values.push((column, value.into()));
        self
    }

    /// Skip the row silently on a constraint conflict.
    pub fn or_ignore(mut self) -> Self {
        self.or_ignore = true;
        self
    }

    pub fn sql(&self) -> String {
        let columns: Vec<&str> = self.values.iter().map(|(c, _)| c.name()).collect();
        let placeholders: Vec<String> = (1..=self.values.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT{} INTO {} ({}) VALUES ({})",
            if self.or_ignore { " OR IGNORE" } else { "" },
            C::TABLE,
            columns.join(", "),
            placeholders.join(", "),
        )
    }

    /// Run the insert. Returns the number of rows written (0 when ignored).
    pub fn execute(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(&self.sql(), params_from_iter(self.values.iter().map(|(_, v)| v)))
    }

    /// Run the insert and return the new row id.
    pub fn execute_returning_id(&self, conn: &Connection) -> rusqlite::Result<i64> {
        self.execute(conn)?;
        Ok(conn.last_insert_rowid())
    }
}

impl<C: Column> Default for Insert<C> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Update ──────────────────────────────────────────────────────────────────

/// `UPDATE <table> SET ... WHERE <key> = ?` with bound values.
#[derive(Debug, Clone)]
pub struct Update<C: Column> {
    set: Vec<(C, Value)>,
    key: (C, Value),
}

impl<C: Column> Update<C> {
    /// Start an update of the row(s) whose `column` equals `value`.
    pub fn by(column: C, value: impl Into<Value>) -> Self {
        Self {
            set: Vec::new(),
            key: (column, value.into()),
        }
    }

    pub fn set(mut self, column: C, value: impl Into<Value>) -> Self {
        self.set.push((column, value.into()));
        self
    }

    pub fn sql(&self) -> String {
        let assignments: Vec<String> = self
            .set
            .iter()
            .enumerate()
            .map(|(i, (c, _))| format!("{} = ?{}", c.name(), i + 1))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            C::TABLE,
            assignments.join(", "),
            self.key.0.name(),
            self.set.len() + 1,
        )
    }

    /// Run the update. Returns the number of rows changed.
    pub fn execute(&self, conn: &Connection) -> rusqlite::Result<usize> {
        let params = self
            .set
            .iter()
            .map(|(_, v)| v)
            .chain(std::iter::once(&self.key.1));
        conn.execute(&self.sql(), params_from_iter(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_sql_uses_placeholders_only() {
        let insert = Insert::new()
            .value(FileColumn::Path, "/a'; DROP TABLE files; --".to_string())
            .value(FileColumn::SizeBytes, 42i64);
        assert_eq!(
            insert.sql(),
            "INSERT INTO files (path, size_bytes) VALUES (?1, ?2)"
        );
    }

    #[test]
    fn insert_or_ignore_sql() {
        let insert = Insert::new()
            .value(ItemColumn::Name, "x".to_string())
            .or_ignore();
        assert_eq!(
            insert.sql(),
            "INSERT OR IGNORE INTO item_entries (name) VALUES (?1)"
        );
    }

    #[test]
    fn update_binds_key_last() {
        let update = Update::by(ItemColumn::Id, 7i64)
            .set(ItemColumn::ContentFile, 3i64)
            .set(ItemColumn::TagsFile, 4i64);
        assert_eq!(
            update.sql(),
            "UPDATE item_entries SET content_file = ?1, tags_file = ?2 WHERE item_id = ?3"
        );
    }
}
