use std::path::PathBuf;

use auphorg_core::ProviderError;
use auphorg_db::{OperationError, SchemaError};
use thiserror::Error;

/// Errors that can occur while ingesting a single file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The path is missing or is not a regular file
    #[error("Not a regular file: {}", path.display())]
    NotAFile { path: PathBuf },

    /// The extension is neither handled nor ignored
    #[error("Unsupported file type '{extension}': {}", path.display())]
    UnsupportedFileType { path: PathBuf, extension: String },

    /// Raw-file measurement failed
    #[error("Failed to measure {}: {source}", path.display())]
    Measure {
        path: PathBuf,
        #[source]
        source: ProviderError,
    },

    /// The catalog rejected a write
    #[error(transparent)]
    Store(#[from] OperationError),

    /// The catalog could not be opened
    #[error("Catalog error: {0}")]
    Schema(#[from] SchemaError),
}

/// Errors that abort a whole scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Errors reading or writing `settings.toml`.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
