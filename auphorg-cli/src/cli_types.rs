//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "auphorg")]
#[command(about = "Catalog photo, video and audio files into items", long_about = None)]
pub(crate) struct Cli {
    /// Catalog database (default: settings value, else test_auphorg.db in the temp dir)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log verbosity: 0 off, 1 error, 2 warn, 3 info, 4 debug, 5 trace
    #[arg(
        short,
        long,
        global = true,
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub verbosity: u8,

    /// Write log output to a file instead of stderr (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    /// Hide the progress bar; progress is reported through the log instead
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Scan a directory tree into the catalog
    Scan {
        /// Root directory to scan
        root: PathBuf,

        /// Leave one CPU core free
        #[arg(long)]
        background: bool,

        /// Number of concurrent workers (default: CPU cores)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Link a second content or tags file to its item as an extra file
        #[arg(long)]
        link_extras: bool,
    },

    /// Show an item by name (its path without extension)
    Item {
        name: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a catalogued file and its tags
    File {
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show catalog statistics
    Stats,

    /// Inspect the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings
    Show,

    /// Print the settings file path
    Path,

    /// Write a settings file with the default values
    Init {
        /// Replace an existing settings file
        #[arg(long)]
        force: bool,
    },
}
