//! Shared vocabulary for the auphorg catalog: media kinds, item naming, and
//! the collaborator contracts for digests and metadata.

pub mod error;
pub mod kind;
pub mod provider;
pub mod util;

pub use error::ProviderError;
pub use kind::{ContentKind, DEFAULT_IGNORED_EXTENSIONS, MediaKind, extension_of, ignore_set};
pub use provider::{ContentDigestProvider, FileInfo, FileInfoProvider, MetadataProvider, TagMap};
pub use util::item_name;
