//! Shared application settings (catalog location, workers, tool paths).
//!
//! The settings file is always `~/.config/auphorg/settings.toml`. Every
//! field is optional; a missing file means all defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use auphorg_core::DEFAULT_IGNORED_EXTENSIONS;

use crate::error::SettingsError;

/// Seconds between progress reports during a scan.
pub const DEFAULT_PROGRESS_INTERVAL_SECS: u64 = 10;

/// File name of the catalog used when nothing else is configured.
pub const DEFAULT_DATABASE_NAME: &str = "test_auphorg.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Catalog database path
    pub database: Option<PathBuf>,
    /// Worker count; the CPU count when unset
    pub workers: Option<usize>,
    pub progress_interval_secs: u64,
    /// Extensions (without the dot) skipped during ingestion
    pub ignored_extensions: Vec<String>,
    pub tools: ToolSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: None,
            workers: None,
            progress_interval_secs: DEFAULT_PROGRESS_INTERVAL_SECS,
            ignored_extensions: DEFAULT_IGNORED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            tools: ToolSettings::default(),
        }
    }
}

/// External programs used by the default providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub exiftool: PathBuf,
    pub ffmpeg: PathBuf,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            exiftool: PathBuf::from("exiftool"),
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

/// Canonical path to the settings file: `~/.config/auphorg/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("auphorg").join("settings.toml")
}

/// Load settings from the canonical location.
pub fn load_settings() -> Result<Settings, SettingsError> {
    load_settings_from(&settings_path())
}

/// Load settings from `path`. A missing file yields the defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write settings to `path`, creating parent directories.
pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(settings)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// The effective settings as pretty-printed TOML, for display.
pub fn settings_to_string(settings: &Settings) -> Result<String, SettingsError> {
    Ok(toml::to_string_pretty(settings)?)
}

/// Catalog used when neither the command line nor the settings name one.
pub fn default_database_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DATABASE_NAME)
}

/// Resolve the catalog path using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. `database` in `settings.toml`
/// 3. `test_auphorg.db` in the system temp directory
pub fn resolve_database_path(cli_override: Option<PathBuf>, settings: &Settings) -> PathBuf {
    if let Some(p) = cli_override {
        return p;
    }
    if let Some(p) = &settings.database {
        return p.clone();
    }
    default_database_path()
}
