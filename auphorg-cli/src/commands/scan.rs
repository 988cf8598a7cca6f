use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use auphorg_core::ignore_set;
use auphorg_lib::{
    LogScanProgress, Providers, ScanOptions, ScanProgress, ScanStats, Settings, default_workers,
};

use crate::CliError;

/// Progress bar for a running scan. Periodic counter polls go to the log.
struct CliScanProgress {
    bar: ProgressBar,
}

impl CliScanProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "  {bar:40.cyan/blue} {pos}/{len} ({percent}%) {wide_msg:.dim}",
            )
            .expect("static pattern")
            .progress_chars("=> "),
        );
        Self { bar }
    }
}

impl ScanProgress for CliScanProgress {
    fn on_discovered(&self, total: usize) {
        self.bar.set_length(total as u64);
        log::info!("Discovered {} files", total);
    }

    fn on_file(&self, done: usize, _total: usize, path: &Path) {
        self.bar.set_position(done as u64);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.set_message(name);
    }

    fn on_progress(&self, processed: usize, total: usize, percent: u8) {
        log::info!("Processed {}/{} files ({}%)", processed, total, percent);
    }

    fn on_file_failed(&self, path: &Path, error: &str) {
        self.bar
            .suspend(|| log::warn!("Skipped {}: {}", path.display(), error));
    }

    fn on_complete(&self, _stats: &ScanStats) {
        self.bar.finish_and_clear();
    }
}

/// Scan `root` into the catalog and print a summary.
pub(crate) fn run_scan(
    root: PathBuf,
    db_path: PathBuf,
    settings: &Settings,
    background: bool,
    workers: Option<usize>,
    link_extras: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let workers = workers
        .or(settings.workers)
        .unwrap_or_else(|| default_workers(background));

    let options = ScanOptions {
        workers,
        progress_interval: Duration::from_secs(settings.progress_interval_secs),
        ignored: ignore_set(settings.ignored_extensions.as_slice()),
        link_extras,
        ..ScanOptions::new(root.clone(), db_path.clone())
    };

    println!(
        "{}",
        format!("Scanning {}", root.display()).if_supports_color(Stdout, |t| t.bold()),
    );
    println!("  Catalog: {}", db_path.display());
    println!("  Workers: {}", workers);

    // Without a bar, periodic progress still reaches the log.
    let progress: Box<dyn ScanProgress> = if quiet {
        Box::new(LogScanProgress)
    } else {
        Box::new(CliScanProgress::new())
    };
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {}", e)))?;
    let stats = rt
        .block_on(auphorg_lib::run_scan(
            options,
            Providers::system(settings),
            progress.as_ref(),
        ))
        .map_err(|e| CliError::scan(e.to_string()))?;

    print_summary(&stats);
    Ok(())
}

fn print_summary(stats: &ScanStats) {
    println!();
    println!("{}", "Scan complete".if_supports_color(Stdout, |t| t.bold()));
    println!("  Discovered: {:>8}", stats.discovered);
    println!(
        "  Ingested:   {:>8}",
        stats.ingested.if_supports_color(Stdout, |t| t.green()),
    );
    println!("  Skipped:    {:>8}", stats.skipped);
    if stats.failed > 0 {
        println!(
            "  Failed:     {:>8}",
            stats.failed.if_supports_color(Stdout, |t| t.red()),
        );
    }
}
