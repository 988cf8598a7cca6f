//! Scan progress reporting.

use std::path::Path;

use crate::scan::ScanStats;

/// Callbacks for a running scan.
///
/// `on_file` fires once per completed file; `on_progress` fires on the
/// periodic poll of the shared processed-file counter.
pub trait ScanProgress {
    /// Called once enumeration has found `total` files.
    fn on_discovered(&self, total: usize);

    /// Called after each file completes, in completion order.
    fn on_file(&self, done: usize, total: usize, path: &Path);

    /// Called every progress interval while workers are busy.
    fn on_progress(&self, processed: usize, total: usize, percent: u8);

    /// Called when a file could not be ingested.
    fn on_file_failed(&self, path: &Path, error: &str);

    /// Called when every file has been processed.
    fn on_complete(&self, stats: &ScanStats);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentScanProgress;

impl ScanProgress for SilentScanProgress {
    fn on_discovered(&self, _: usize) {}
    fn on_file(&self, _: usize, _: usize, _: &Path) {}
    fn on_progress(&self, _: usize, _: usize, _: u8) {}
    fn on_file_failed(&self, _: &Path, _: &str) {}
    fn on_complete(&self, _: &ScanStats) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogScanProgress;

impl ScanProgress for LogScanProgress {
    fn on_discovered(&self, total: usize) {
        log::info!("Discovered {} files", total);
    }

    fn on_file(&self, done: usize, total: usize, path: &Path) {
        log::debug!("  [{}/{}] {}", done, total, path.display());
    }

    fn on_progress(&self, processed: usize, total: usize, percent: u8) {
        log::info!("Processed {}/{} files ({}%)", processed, total, percent);
    }

    fn on_file_failed(&self, path: &Path, error: &str) {
        log::warn!("Skipped {}: {}", path.display(), error);
    }

    fn on_complete(&self, stats: &ScanStats) {
        log::info!(
            "Scan complete: {} ingested, {} skipped, {} failed of {} discovered",
            stats.ingested,
            stats.skipped,
            stats.failed,
            stats.discovered
        );
    }
}
