//! Logging infrastructure.
//!
//! Structured logging via the `log` facade with an `env_logger` backend.
//! The level is decided by, in priority order:
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (errors only) or `-v`/`-vv`
//! 3. Default: info
//!
//! While the TUI owns the terminal (raw mode, alternate screen), writing
//! log lines to stderr would corrupt the display. For the `scan`
//! subcommand the logger therefore writes to `qrlink.log` under the
//! platform cache directory; `check` and `--once` log to stderr as usual.

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use directories::ProjectDirs;
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Where the logger writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Standard error; fine whenever the terminal is not in raw mode.
    Stderr,
    /// A log file under the cache directory, for TUI runs.
    File,
}

/// Initialize the logging subsystem.
///
/// Call once, before any logging. `verbose` counts `-v` occurrences
/// (0 = info, 1 = debug, 2+ = trace); `quiet` wins over `verbose`.
/// Returns the log file path when one is in use, for the TUI footer.
pub fn init_logging(verbose: u8, quiet: bool, destination: LogDestination) -> Option<PathBuf> {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(level_for(verbose, quiet));
    }

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} [{}] {}",
            buf.timestamp_seconds(),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    let log_path = match destination {
        LogDestination::Stderr => None,
        LogDestination::File => match open_log_file() {
            Ok((file, path)) => {
                builder.target(Target::Pipe(Box::new(file)));
                Some(path)
            }
            Err(e) => {
                // Fall back to stderr rather than losing logs entirely;
                // a corrupted frame beats silence when debugging.
                eprintln!("warning: could not open log file: {}", e);
                None
            }
        },
    };

    builder.init();
    log::debug!("Logging initialized at {:?}", log::max_level());
    log_path
}

/// Map CLI flags to a level filter.
fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Open (truncating) the log file under the platform cache directory.
fn open_log_file() -> std::io::Result<(File, PathBuf)> {
    let dirs = ProjectDirs::from("io", "qrlink", "qrlink").ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no cache directory available")
    })?;
    let dir = dirs.cache_dir();
    fs::create_dir_all(dir)?;

    let path = dir.join("qrlink.log");
    let file = File::create(&path)?;
    Ok((file, path))
}
