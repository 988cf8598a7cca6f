//! Logger setup: `env_logger` with a timestamped format, filtered by
//! `--verbosity` and overridable through `RUST_LOG`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

use crate::CliError;

/// Map `--verbosity` (0-5) to a level filter. Values above 5 saturate.
pub(crate) fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger. Logs go to `logfile` when given (ANSI codes
/// stripped), stderr otherwise.
pub(crate) fn init_logger(verbosity: u8, logfile: Option<&Path>) -> Result<(), CliError> {
    let mut builder = Builder::new();
    builder
        .filter_level(level_for(verbosity))
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                std::thread::current().name().unwrap_or("worker"),
                record.module_path().unwrap_or("?"),
                record.args()
            )
        });

    match logfile {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .target(Target::Pipe(Box::new(strip_ansi_escapes::Writer::new(file))))
                .write_style(WriteStyle::Never);
        }
        None => {
            builder.target(Target::Stderr);
        }
    }

    builder
        .try_init()
        .map_err(|e| CliError::runtime(format!("Failed to initialize logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::Off);
        assert_eq!(level_for(1), LevelFilter::Error);
        assert_eq!(level_for(2), LevelFilter::Warn);
        assert_eq!(level_for(3), LevelFilter::Info);
        assert_eq!(level_for(4), LevelFilter::Debug);
        assert_eq!(level_for(5), LevelFilter::Trace);
        assert_eq!(level_for(9), LevelFilter::Trace);
    }
}
