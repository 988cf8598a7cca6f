use std::sync::Arc;

use auphorg_core::{ContentDigestProvider, FileInfoProvider, MetadataProvider};

use crate::hasher::{DecodingDigester, Sha512FileInfo};
use crate::metadata::ExifTool;
use crate::settings::Settings;

/// The three collaborators an ingestor measures files with, shared across
/// workers.
#[derive(Clone)]
pub struct Providers {
    pub file_info: Arc<dyn FileInfoProvider>,
    pub content: Arc<dyn ContentDigestProvider>,
    pub metadata: Arc<dyn MetadataProvider>,
}

impl Providers {
    pub fn new(
        file_info: Arc<dyn FileInfoProvider>,
        content: Arc<dyn ContentDigestProvider>,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self {
            file_info,
            content,
            metadata,
        }
    }

    /// SHA-512 measurement, in-process decoding, and the configured
    /// `ffmpeg`/`exiftool` binaries.
    pub fn system(settings: &Settings) -> Self {
        Self::new(
            Arc::new(Sha512FileInfo),
            Arc::new(DecodingDigester::new(&settings.tools.ffmpeg)),
            Arc::new(ExifTool::new(&settings.tools.exiftool)),
        )
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers").finish_non_exhaustive()
    }
}
