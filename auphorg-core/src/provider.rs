//! Contracts for the external collaborators the ingestor depends on.
//!
//! The catalog engine never computes digests or reads metadata itself; it
//! asks these providers. Default implementations live in `auphorg-lib`;
//! tests substitute fakes.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ProviderError;
use crate::kind::ContentKind;

/// Metadata tag name → value, as produced by a [`MetadataProvider`].
pub type TagMap = BTreeMap<String, String>;

/// Raw-file measurements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Hex digest of the file's raw bytes
    pub digest: String,
    /// Last modification time, RFC 3339 (UTC)
    pub modified: String,
    /// File size in bytes
    pub size: u64,
}

/// Computes the raw-byte digest, modification time and size of a file.
///
/// Fails only on I/O errors.
pub trait FileInfoProvider: Send + Sync {
    fn file_info(&self, path: &Path) -> Result<FileInfo, ProviderError>;
}

/// Computes a digest over decoded content (pixels, audio frames, a
/// transcoded video stream), so that re-encoded containers with identical
/// content hash the same.
///
/// Failures are expected (corrupt or exotic files) and are not fatal to
/// ingestion.
pub trait ContentDigestProvider: Send + Sync {
    fn content_digest(&self, kind: ContentKind, path: &Path) -> Result<String, ProviderError>;
}

/// Extracts descriptive metadata tags from a file.
///
/// May return a partial or empty map when the file carries few tags.
pub trait MetadataProvider: Send + Sync {
    fn metadata(&self, path: &Path) -> Result<TagMap, ProviderError>;
}
