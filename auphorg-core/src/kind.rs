use std::collections::HashSet;
use std::path::Path;

/// Media kinds recognized by the ingestor.
///
/// Classification is purely extension-based (case-insensitive). Each kind
/// decides how a file is measured and which role it plays in its item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// JPEG images and camera thumbnails; the metadata-bearing kind.
    Jpeg,
    /// TIFF images
    Tiff,
    /// Camera RAW containers
    Raw,
    /// Video clips
    Video,
    /// WAV audio (voice memos recorded alongside a shot)
    Audio,
    /// Files deliberately skipped (thumbnail caches, playlist stubs)
    Ignored,
    /// Anything else
    Unknown,
}

/// Extensions that are ignored when no configuration overrides them.
pub const DEFAULT_IGNORED_EXTENSIONS: &[&str] = &["db", "strm"];

/// All ingestible variants, in classification order.
const INGESTIBLE_KINDS: &[MediaKind] = &[
    MediaKind::Jpeg,
    MediaKind::Tiff,
    MediaKind::Raw,
    MediaKind::Video,
    MediaKind::Audio,
];

/// Which decoder a content digest is computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    /// Lowercase extensions (without the dot) handled by this kind.
    ///
    /// `Ignored` and `Unknown` have no fixed extension list: the ignore set
    /// is configured at runtime and `Unknown` is the fallback.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Jpeg => &["jpg", "jpeg", "jpe", "thm", "jpg_original"],
            Self::Tiff => &["tif", "tiff"],
            Self::Raw => &["raw", "rw2"],
            Self::Video => &["avi", "mov", "wmv"],
            Self::Audio => &["wav"],
            Self::Ignored | Self::Unknown => &[],
        }
    }

    /// Short lowercase label used in logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Tiff => "tiff",
            Self::Raw => "raw",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Ignored => "ignored",
            Self::Unknown => "unknown",
        }
    }

    /// The decoder used for this kind's content digest.
    ///
    /// `Raw` has none: the container is already the canonical byte stream,
    /// so its content digest is the file digest.
    pub fn content_kind(&self) -> Option<ContentKind> {
        match self {
            Self::Jpeg | Self::Tiff => Some(ContentKind::Image),
            Self::Video => Some(ContentKind::Video),
            Self::Audio => Some(ContentKind::Audio),
            Self::Raw | Self::Ignored | Self::Unknown => None,
        }
    }

    /// Map a bare extension (no dot) to an ingestible kind.
    ///
    /// Returns `Unknown` for anything not handled; the ignore set is not
    /// consulted here, see [`MediaKind::classify`].
    pub fn from_extension(ext: &str) -> MediaKind {
        let lower = ext.to_lowercase();
        INGESTIBLE_KINDS
            .iter()
            .copied()
            .find(|kind| kind.extensions().contains(&lower.as_str()))
            .unwrap_or(MediaKind::Unknown)
    }

    /// Classify a path by extension.
    ///
    /// `ignored` holds lowercase extensions without the dot. A path without
    /// an extension is `Unknown`.
    pub fn classify(path: &Path, ignored: &HashSet<String>) -> MediaKind {
        let Some(ext) = extension_of(path) else {
            return MediaKind::Unknown;
        };
        if ignored.contains(&ext) {
            return MediaKind::Ignored;
        }
        MediaKind::from_extension(&ext)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

/// Lowercase extension of `path` without the dot, if it has one.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_lowercase())
}

/// Build an ignore set from a list of extensions, normalizing case and
/// stripping a leading dot.
pub fn ignore_set<S: AsRef<str>>(extensions: &[S]) -> HashSet<String> {
    extensions
        .iter()
        .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_ignored() -> HashSet<String> {
        ignore_set(DEFAULT_IGNORED_EXTENSIONS)
    }

    #[test]
    fn jpeg_family_is_case_insensitive() {
        let ignored = default_ignored();
        for name in [
            "a.jpg",
            "a.JPG",
            "a.jpeg",
            "a.Jpe",
            "a.THM",
            "a.jpg_original",
        ] {
            assert_eq!(
                MediaKind::classify(Path::new(name), &ignored),
                MediaKind::Jpeg,
                "{} should be a jpeg",
                name
            );
        }
    }

    #[test]
    fn other_kinds_classify() {
        let ignored = default_ignored();
        let cases = [
            ("scan.tif", MediaKind::Tiff),
            ("shot.RW2", MediaKind::Raw),
            ("shot.raw", MediaKind::Raw),
            ("clip.avi", MediaKind::Video),
            ("clip.MOV", MediaKind::Video),
            ("clip.wmv", MediaKind::Video),
            ("memo.wav", MediaKind::Audio),
            ("Thumbs.db", MediaKind::Ignored),
            ("movie.strm", MediaKind::Ignored),
            ("notes.txt", MediaKind::Unknown),
            ("README", MediaKind::Unknown),
        ];
        for (name, expected) in cases {
            assert_eq!(
                MediaKind::classify(Path::new(name), &ignored),
                expected,
                "classifying '{}'",
                name
            );
        }
    }

    #[test]
    fn ignore_set_overrides_known_kinds() {
        let ignored = ignore_set(&[".WAV"]);
        assert_eq!(
            MediaKind::classify(Path::new("memo.wav"), &ignored),
            MediaKind::Ignored
        );
        assert_eq!(
            MediaKind::classify(Path::new("Thumbs.db"), &ignored),
            MediaKind::Unknown
        );
    }

    #[test]
    fn content_kinds() {
        assert_eq!(MediaKind::Jpeg.content_kind(), Some(ContentKind::Image));
        assert_eq!(MediaKind::Tiff.content_kind(), Some(ContentKind::Image));
        assert_eq!(MediaKind::Video.content_kind(), Some(ContentKind::Video));
        assert_eq!(MediaKind::Audio.content_kind(), Some(ContentKind::Audio));
        assert_eq!(MediaKind::Raw.content_kind(), None);
    }
}
