//! Default values for submodule-sync.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Manifest file looked up at the repository root.
pub const MANIFEST_FILE: &str = "default.xml";

/// Folder, relative to the repository root, that submodules are placed in.
pub const OUTPUT_DIR: &str = "libs";

/// Name of the per-run log file.
pub const LOG_FILE: &str = "submodule_setup.log";

/// Seconds a single external command may run before it is killed.
pub const COMMAND_TIMEOUT_SECS: u64 = 600;

/// Returns the default manifest path for the repository at `root`.
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILE)
}

/// Returns the default log file location.
///
/// Uses the user's home directory, falling back to the current directory
/// when no home directory can be determined.
///
/// This can be overridden by the `--log-file` CLI flag or the
/// `SUBMODULE_SYNC_LOG` environment variable.
pub fn log_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE)
}

/// Converts a timeout in seconds to a duration; zero disables the timeout.
pub fn command_timeout(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_path() {
        assert_eq!(
            manifest_path(Path::new("/repo")),
            PathBuf::from("/repo/default.xml")
        );
    }

    #[test]
    fn test_log_file_name() {
        assert!(log_file().ends_with("submodule_setup.log"));
    }

    #[test]
    fn test_command_timeout() {
        assert_eq!(command_timeout(0), None);
        assert_eq!(command_timeout(30), Some(Duration::from_secs(30)));
    }
}
