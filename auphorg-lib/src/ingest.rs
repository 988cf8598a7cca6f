//! Per-file ingestion: classify, measure, store, and link to an item.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;

use auphorg_catalog::{NewFile, TagsRecord};
use auphorg_core::{
    ContentKind, DEFAULT_IGNORED_EXTENSIONS, FileInfo, MediaKind, ProviderError, TagMap,
    extension_of, ignore_set, item_name,
};
use auphorg_db::{OperationError, operations, open_database};

use crate::error::IngestError;
use crate::providers::Providers;

// ── Write lock ──────────────────────────────────────────────────────────────

/// Serializes catalog writes across workers and counts processed files.
///
/// One lock is created per scan and cloned into every worker. A worker that
/// panics while holding it does not block the others.
#[derive(Debug, Clone, Default)]
pub struct WriteLock {
    processed: Arc<Mutex<usize>>,
}

impl WriteLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock. The guard derefs to the processed-file counter.
    pub fn lock(&self) -> MutexGuard<'_, usize> {
        self.processed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count one more completed file. Returns the new total.
    pub fn mark_processed(&self) -> usize {
        let mut count = self.lock();
        *count += 1;
        *count
    }

    pub fn processed(&self) -> usize {
        *self.lock()
    }
}

// ── Options and outcomes ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Lowercase extensions (no dot) to skip.
    pub ignored: HashSet<String>,
    /// Link a file as an extra when its item's role slot is already taken,
    /// instead of failing.
    pub link_extras: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            ignored: ignore_set(DEFAULT_IGNORED_EXTENSIONS),
            link_extras: false,
        }
    }
}

/// The part a stored file plays in its item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Content,
    Tags,
    Extra,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Content => write!(f, "content"),
            Self::Tags => write!(f, "tags"),
            Self::Extra => write!(f, "extra"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Stored { kind: MediaKind, role: Role },
    Skipped { kind: MediaKind },
}

// ── Ingestor ────────────────────────────────────────────────────────────────

/// Adds files to the catalog through one connection.
///
/// Measurement runs unlocked; every catalog call holds the shared
/// [`WriteLock`].
pub struct Ingestor {
    conn: Connection,
    lock: WriteLock,
    providers: Providers,
    options: IngestOptions,
}

impl Ingestor {
    /// Open (creating if needed) the catalog at `db_path`.
    pub fn open(
        db_path: &Path,
        lock: WriteLock,
        providers: Providers,
        options: IngestOptions,
    ) -> Result<Self, IngestError> {
        let conn = {
            let _guard = lock.lock();
            open_database(db_path)?
        };
        Ok(Self::from_connection(conn, lock, providers, options))
    }

    pub fn from_connection(
        conn: Connection,
        lock: WriteLock,
        providers: Providers,
        options: IngestOptions,
    ) -> Self {
        Self {
            conn,
            lock,
            providers,
            options,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run one catalog call under the write lock.
    fn write<T>(
        &self,
        op: impl FnOnce(&Connection) -> Result<T, OperationError>,
    ) -> Result<T, OperationError> {
        let _guard = self.lock.lock();
        op(&self.conn)
    }

    /// Catalog one file and attach it to the item named after it.
    ///
    /// Classification happens before the item is created, so ignored
    /// extensions are skipped and unknown ones rejected without leaving an
    /// empty item behind.
    pub fn add_file(&self, path: &Path) -> Result<IngestOutcome, IngestError> {
        let is_file = std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            return Err(IngestError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let kind = MediaKind::classify(path, &self.options.ignored);
        match kind {
            MediaKind::Ignored => {
                log::debug!("Skipping ignored file {}", path.display());
                return Ok(IngestOutcome::Skipped { kind });
            }
            MediaKind::Unknown => {
                return Err(IngestError::UnsupportedFileType {
                    path: path.to_path_buf(),
                    extension: extension_of(path).unwrap_or_default(),
                });
            }
            _ => {}
        }

        let name = item_name(path);
        if self.write(|conn| operations::create_item(conn, &name, false))? {
            log::debug!("Created item '{}'", name);
        }

        match kind {
            MediaKind::Jpeg => self.add_jpeg(path, &name),
            MediaKind::Tiff | MediaKind::Video | MediaKind::Audio => {
                self.add_decoded(kind, path, &name)
            }
            MediaKind::Raw => self.add_raw(path, &name),
            MediaKind::Ignored | MediaKind::Unknown => Ok(IngestOutcome::Skipped { kind }),
        }
    }

    /// JPEG: the metadata-bearing file of its item.
    fn add_jpeg(&self, path: &Path, name: &str) -> Result<IngestOutcome, IngestError> {
        let info = self.measure(path)?;
        let tags = self.metadata(path);
        let content = self.content_digest(ContentKind::Image, path, &info);
        let file = new_file(path, info, Some(content))?;

        self.write(|conn| {
            operations::insert_rich_file(conn, &file, &TagsRecord::from_tag_map(&tags))
        })?;
        self.attach(MediaKind::Jpeg, Role::Tags, &file.path, name)
    }

    /// TIFF, video and audio: content files with a decoded-content digest.
    fn add_decoded(
        &self,
        kind: MediaKind,
        path: &Path,
        name: &str,
    ) -> Result<IngestOutcome, IngestError> {
        let info = self.measure(path)?;
        let content = match kind.content_kind() {
            Some(ck) => self.content_digest(ck, path, &info),
            None => info.digest.clone(),
        };
        let file = new_file(path, info, Some(content))?;

        self.write(|conn| operations::insert_file(conn, &file))?;
        self.attach(kind, Role::Content, &file.path, name)
    }

    /// RAW: the container bytes are the content.
    fn add_raw(&self, path: &Path, name: &str) -> Result<IngestOutcome, IngestError> {
        let info = self.measure(path)?;
        let content = info.digest.clone();
        let file = new_file(path, info, Some(content))?;

        self.write(|conn| operations::insert_file(conn, &file))?;
        self.attach(MediaKind::Raw, Role::Content, &file.path, name)
    }

    fn attach(
        &self,
        kind: MediaKind,
        role: Role,
        path: &str,
        name: &str,
    ) -> Result<IngestOutcome, IngestError> {
        let attached = self.write(|conn| match role {
            Role::Tags => operations::attach_tags(conn, name, path),
            Role::Content | Role::Extra => operations::attach_content(conn, name, path),
        });

        match attached {
            Ok(()) => Ok(IngestOutcome::Stored { kind, role }),
            Err(e) if self.options.link_extras && e.is_role_taken() => {
                log::debug!("{}; linking {} as an extra file", e, path);
                self.write(|conn| operations::link_extra_file(conn, path, name))?;
                Ok(IngestOutcome::Stored {
                    kind,
                    role: Role::Extra,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn measure(&self, path: &Path) -> Result<FileInfo, IngestError> {
        self.providers
            .file_info
            .file_info(path)
            .map_err(|source| IngestError::Measure {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Decoded-content digest, or the file digest when decoding fails.
    fn content_digest(&self, kind: ContentKind, path: &Path, info: &FileInfo) -> String {
        match self.providers.content.content_digest(kind, path) {
            Ok(digest) => digest,
            Err(e) => {
                log::warn!(
                    "Could not decode {} content of {}: {}; using file digest",
                    kind,
                    path.display(),
                    e
                );
                info.digest.clone()
            }
        }
    }

    /// Extracted tags, or none when extraction fails.
    fn metadata(&self, path: &Path) -> TagMap {
        self.providers.metadata.metadata(path).unwrap_or_else(|e| {
            log::warn!("Could not read metadata of {}: {}", path.display(), e);
            TagMap::new()
        })
    }
}

fn new_file(
    path: &Path,
    info: FileInfo,
    content_digest: Option<String>,
) -> Result<NewFile, IngestError> {
    let size_bytes = i64::try_from(info.size).map_err(|_| IngestError::Measure {
        path: path.to_path_buf(),
        source: ProviderError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("size {} does not fit the catalog", info.size),
        )),
    })?;
    Ok(NewFile {
        path: path.to_string_lossy().into_owned(),
        modified_time: info.modified,
        size_bytes,
        file_digest: info.digest,
        content_digest,
    })
}
