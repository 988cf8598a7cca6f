use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use auphorg_lib::Settings;
use auphorg_lib::settings::{
    resolve_database_path, save_settings_to, settings_path, settings_to_string,
};

use crate::CliError;

/// Show the effective settings and where they come from.
pub(crate) fn run_config_show(settings: &Settings) -> Result<(), CliError> {
    let path = settings_path();

    println!(
        "{}",
        "auphorg Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();
    if path.exists() {
        println!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        println!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    println!(
        "  Catalog:       {}",
        resolve_database_path(None, settings).display()
    );
    println!();

    let text = settings_to_string(settings).map_err(|e| CliError::config(e.to_string()))?;
    for line in text.lines() {
        println!("  {}", line);
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    println!("{}", settings_path().display());
}

/// Write the default settings to `path`. An existing file is kept unless
/// `force` is set.
pub(crate) fn run_config_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    save_settings_to(&Settings::default(), path).map_err(|e| CliError::config(e.to_string()))?;
    println!(
        "{} {}",
        "Wrote".if_supports_color(Stdout, |t| t.green()),
        path.display(),
    );
    Ok(())
}
