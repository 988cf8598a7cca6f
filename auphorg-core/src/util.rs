use std::path::Path;

/// Derive the item name for a file: the path with its final extension
/// removed.
///
/// `/photos/2009/trip.jpg` and `/photos/2009/trip.RW2` both map to
/// `/photos/2009/trip`. A path without an extension is its own name.
pub fn item_name(path: &Path) -> String {
    path.with_extension("").to_string_lossy().into_owned()
}

/// Percentage of `done` out of `total`, rounded down. An empty total counts
/// as complete.
pub fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done.min(total) * 100) / total) as u8
}

/// Format a byte count with fractional KB/MB (e.g., "1.5 KB", "2.3 MB").
pub fn format_bytes_approx(bytes: u64) -> String {
    if bytes >= 1024 * 1024 * 1024 {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
