//! Ingestion engine for the media catalog.
//!
//! Walks a directory tree, measures every file with the configured
//! [`Providers`], and records files, tags and items through `auphorg-db`.

pub mod error;
pub mod hasher;
pub mod ingest;
pub mod metadata;
pub mod progress;
pub mod providers;
pub mod scan;
pub mod settings;
pub mod worker_pool;

pub use error::{IngestError, ScanError, SettingsError};
pub use hasher::{DecodingDigester, Sha512FileInfo};
pub use ingest::{IngestOptions, IngestOutcome, Ingestor, Role, WriteLock};
pub use metadata::ExifTool;
pub use progress::{LogScanProgress, ScanProgress, SilentScanProgress};
pub use providers::Providers;
pub use scan::{ScanOptions, ScanStats, default_workers, enumerate, run_scan};
pub use settings::Settings;
pub use worker_pool::WorkerPool;
