//! # Error Handling
//!
//! This module defines the centralized error type for `submodule-sync`. It
//! uses the `thiserror` library to build an `Error` enum covering every
//! failure that aborts a run before any submodule is touched.
//!
//! ## Fatal versus recorded failures
//!
//! Only problems that make reconciliation unsafe are represented here:
//!
//! - The manifest is missing, malformed, or fails validation.
//! - The registration file exists but cannot be read or parsed.
//! - The repository root cannot be located.
//! - The per-run log file cannot be created.
//!
//! A failing external command is *not* an `Error`. It is recorded as an
//! [`ActionOutcome`](crate::process::ActionOutcome) and surfaced through the
//! [`RunReport`](crate::report::RunReport), so one failing step never stops
//! the remaining independent steps.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for submodule-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest file does not exist.
    #[error("Manifest file not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    /// The manifest file exists but is not a well-formed manifest document.
    #[error("Manifest parsing error in {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    /// The manifest parsed but declares projects that cannot be reconciled.
    ///
    /// Every problem found is listed, not just the first.
    #[error("Manifest validation failed for {}:\n  - {}", path.display(), problems.join("\n  - "))]
    ManifestValidation {
        path: PathBuf,
        problems: Vec<String>,
    },

    /// The registration file exists but could not be read or understood.
    #[error("Registration file error in {}: {message}", path.display())]
    RegistryRead { path: PathBuf, message: String },

    /// No ancestor of the starting directory contains a `.git` entry.
    #[error("Could not find repository root from {}", start.display())]
    RepositoryRootNotFound { start: PathBuf },

    /// The per-run log file could not be set up.
    #[error("Log setup error for {}: {message}", path.display())]
    LogSetup { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred during serialization.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
