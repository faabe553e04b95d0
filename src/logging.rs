//! # Run Log
//!
//! Every run writes a fresh audit log: the manifest contents, the registered
//! submodules, every command issued and every failure. The library only
//! talks to the `log` facade; this module installs an `env_logger` backend
//! that sends records to a file instead of the terminal.
//!
//! Records look like:
//!
//! ```text
//! 2026-10-18T09:12:44.120Z - INFO - Removing submodule libs/c
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

use crate::error::{Error, Result};

/// Parse a level name such as `debug` or `warn`.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level).map_err(|_| Error::LogSetup {
        path: Path::new("-").to_path_buf(),
        message: format!(
            "unknown log level '{}' (expected off, error, warn, info, debug or trace)",
            level
        ),
    })
}

/// Build a logger that truncates `path` and writes records at `level` and
/// above to it.
pub fn file_logger(path: &Path, level: LevelFilter) -> Result<env_logger::Logger> {
    let setup_error = |message: String| Error::LogSetup {
        path: path.to_path_buf(),
        message,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| setup_error(e.to_string()))?;
    }
    let file = File::create(path).map_err(|e| setup_error(e.to_string()))?;

    let logger = Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(file)))
        .build();

    Ok(logger)
}

/// Install the file logger as the process-wide logger.
pub fn init_file_logger(path: &Path, level: LevelFilter) -> Result<()> {
    let logger = file_logger(path, level)?;
    let max_level = logger.filter();
    log::set_boxed_logger(Box::new(logger)).map_err(|e| Error::LogSetup {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log::set_max_level(max_level);
    Ok(())
}
