pub(crate) mod config;
pub(crate) mod file;
pub(crate) mod item;
pub(crate) mod scan;
pub(crate) mod stats;

use std::path::Path;

use auphorg_db::Connection;

use crate::CliError;

/// Open an existing catalog for the read-only commands. A missing file is
/// reported instead of silently creating an empty catalog.
pub(crate) fn open_existing(db_path: &Path) -> Result<Connection, CliError> {
    if !db_path.exists() {
        return Err(CliError::not_found(format!(
            "No catalog database found at {}. Run 'auphorg scan <root>' first.",
            db_path.display()
        )));
    }
    auphorg_db::open_database(db_path)
        .map_err(|e| CliError::database(format!("Failed to open catalog database: {}", e)))
}
