//! auphorg CLI
//!
//! Command-line interface for cataloguing photo, video and audio files.

mod cli_types;
mod commands;
mod error;
mod logging;

pub(crate) use error::CliError;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use auphorg_lib::settings::{load_settings, resolve_database_path, settings_path};

use cli_types::{Cli, Commands, ConfigAction};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        eprintln!("{} {}", "Error:".if_supports_color(Stderr, |t| t.red()), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    logging::init_logger(cli.verbosity, cli.logfile.as_deref())?;

    let settings = load_settings().map_err(|e| CliError::config(e.to_string()))?;
    let db_path = resolve_database_path(cli.db, &settings);
    log::debug!("Using catalog database {}", db_path.display());

    match cli.command {
        Commands::Scan {
            root,
            background,
            workers,
            link_extras,
        } => commands::scan::run_scan(
            root,
            db_path,
            &settings,
            background,
            workers,
            link_extras,
            cli.quiet,
        ),
        Commands::Item { name, json } => commands::item::run_item(&db_path, &name, json),
        Commands::File { path, json } => commands::file::run_file(&db_path, &path, json),
        Commands::Stats => commands::stats::run_stats(&db_path),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&settings),
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
            ConfigAction::Init { force } => {
                commands::config::run_config_init(&settings_path(), force)
            }
        },
    }
}
