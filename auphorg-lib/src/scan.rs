//! Tree walking and the concurrent ingestion pipeline.
//!
//! Enumerates every regular file under a root, then feeds them through a
//! fixed-size [`WorkerPool`]. Each file is ingested on the blocking thread
//! pool by its own [`Ingestor`]; a failure is logged and counted, never
//! fatal to the scan.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, interval_at};
use walkdir::WalkDir;

use auphorg_core::{DEFAULT_IGNORED_EXTENSIONS, ignore_set, util::percent};
use auphorg_db::open_database;

use crate::error::ScanError;
use crate::ingest::{IngestOptions, IngestOutcome, Ingestor, WriteLock};
use crate::progress::ScanProgress;
use crate::providers::Providers;
use crate::worker_pool::WorkerPool;

/// Options for one scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub root: PathBuf,
    pub db_path: PathBuf,
    pub workers: usize,
    pub progress_interval: Duration,
    pub ignored: HashSet<String>,
    pub link_extras: bool,
}

impl ScanOptions {
    pub fn new(root: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            db_path: db_path.into(),
            workers: default_workers(false),
            progress_interval: Duration::from_secs(10),
            ignored: ignore_set(DEFAULT_IGNORED_EXTENSIONS),
            link_extras: false,
        }
    }
}

/// Statistics from a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub discovered: usize,
    pub ingested: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Worker count for a scan: one per CPU core, one fewer in background mode
/// so the machine stays responsive. Never below one.
pub fn default_workers(background: bool) -> usize {
    let cores = num_cpus::get();
    let workers = if background {
        cores.saturating_sub(1)
    } else {
        cores
    };
    workers.max(1)
}

/// Recursively list the regular files under `root`.
///
/// Symlinks are neither followed nor listed. Unreadable entries are logged
/// and skipped. The result is sorted for a stable submission order.
pub fn enumerate(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let meta = std::fs::metadata(root)?;
    if !meta.is_dir() {
        return Err(ScanError::Io(std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            format!("{} is not a directory", root.display()),
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => log::warn!("Cannot read {}: {}", display_walk_path(&e), e),
        }
    }
    files.sort();
    Ok(files)
}

fn display_walk_path(e: &walkdir::Error) -> String {
    e.path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "?".to_string())
}

// ── Pipeline ────────────────────────────────────────────────────────────────

/// State shared by every worker of one scan.
struct ScanContext {
    db_path: PathBuf,
    lock: WriteLock,
    providers: Providers,
    ingest: IngestOptions,
    total: usize,
}

/// What happened to one file.
enum FileResult {
    Ingested,
    Skipped,
    Failed { path: PathBuf, error: String },
}

/// Scan `options.root` into the catalog at `options.db_path`.
///
/// Returns once every discovered file has been processed.
pub async fn run_scan(
    options: ScanOptions,
    providers: Providers,
    progress: &dyn ScanProgress,
) -> Result<ScanStats, ScanError> {
    let root = options.root.clone();
    let paths = tokio::task::spawn_blocking(move || enumerate(&root))
        .await
        .map_err(|e| ScanError::Runtime(format!("Enumeration task failed: {}", e)))??;
    let total = paths.len();
    progress.on_discovered(total);

    // Create the catalog once, before any worker races to do it.
    drop(open_database(&options.db_path)?);

    let ctx = Arc::new(ScanContext {
        db_path: options.db_path.clone(),
        lock: WriteLock::new(),
        providers,
        ingest: IngestOptions {
            ignored: options.ignored.clone(),
            link_extras: options.link_extras,
        },
        total,
    });

    log::info!(
        "Scanning {} files under {} with {} workers",
        total,
        options.root.display(),
        options.workers
    );

    let items: Vec<(usize, PathBuf)> = paths.into_iter().enumerate().collect();
    let worker_ctx = ctx.clone();
    let mut pool = WorkerPool::start(options.workers, items, move |(index, path)| {
        let ctx = worker_ctx.clone();
        async move {
            let display = path.clone();
            let result = tokio::task::spawn_blocking(move || process_file(&ctx, index, &path)).await;
            (display, result)
        }
    });

    let period = options.progress_interval.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    let mut stats = ScanStats {
        discovered: total,
        ..Default::default()
    };
    let mut done = 0;

    loop {
        tokio::select! {
            next = pool.recv() => {
                let Some((path, result)) = next else { break };
                done += 1;
                match result {
                    Ok(FileResult::Ingested) => stats.ingested += 1,
                    Ok(FileResult::Skipped) => stats.skipped += 1,
                    Ok(FileResult::Failed { path, error }) => {
                        stats.failed += 1;
                        progress.on_file_failed(&path, &error);
                    }
                    Err(e) => {
                        stats.failed += 1;
                        log::error!("Worker for {} panicked: {}", path.display(), e);
                        progress.on_file_failed(&path, &e.to_string());
                    }
                }
                progress.on_file(done, total, &path);
            }
            _ = ticker.tick() => {
                let processed = ctx.lock.processed();
                progress.on_progress(processed, ctx.total, percent(processed, ctx.total));
            }
        }
    }

    progress.on_complete(&stats);
    Ok(stats)
}

/// Counts a file as processed when dropped, including during a panic unwind.
struct ProcessedGuard<'a>(&'a WriteLock);

impl Drop for ProcessedGuard<'_> {
    fn drop(&mut self) {
        self.0.mark_processed();
    }
}

/// Ingest one file with a fresh connection. Errors become a logged
/// [`FileResult::Failed`].
fn process_file(ctx: &ScanContext, index: usize, path: &Path) -> FileResult {
    let processed = ProcessedGuard(&ctx.lock);
    let result = Ingestor::open(
        &ctx.db_path,
        ctx.lock.clone(),
        ctx.providers.clone(),
        ctx.ingest.clone(),
    )
    .and_then(|ingestor| ingestor.add_file(path));
    drop(processed);

    match result {
        Ok(IngestOutcome::Stored { kind, role }) => {
            log::debug!("Stored {} as {} {}", path.display(), kind, role);
            FileResult::Ingested
        }
        Ok(IngestOutcome::Skipped { kind }) => {
            log::debug!("Skipped {} ({})", path.display(), kind);
            FileResult::Skipped
        }
        Err(e) => {
            log::error!(
                "Failed to ingest {} (file {} of {}): {}",
                path.display(),
                index + 1,
                ctx.total,
                e
            );
            FileResult::Failed {
                path: path.to_path_buf(),
                error: e.to_string(),
            }
        }
    }
}
