//! CLI argument parsing and command dispatch

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use submodule_sync::{defaults, repository};

use crate::commands;

/// Submodule Sync - Reconcile git submodules against a manifest
#[derive(Parser, Debug)]
#[command(name = "submodule-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add, remove and update submodules so they match the manifest
    Sync(commands::sync::SyncArgs),

    /// Show what sync would do without changing anything
    Plan(commands::plan::PlanArgs),

    /// Check that the manifest parses and every project resolves
    Validate(commands::validate::ValidateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

/// Manifest location options shared by every command that reads one.
#[derive(Args, Debug, Clone)]
pub struct ManifestArgs {
    /// Path to the manifest file (defaults to default.xml at the repository root)
    #[arg(short, long, value_name = "FILE", env = "SUBMODULE_SYNC_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Folder, relative to the repository root, that submodules live in
    #[arg(short, long, value_name = "DIR", default_value = defaults::OUTPUT_DIR)]
    pub output: PathBuf,
}

impl ManifestArgs {
    /// Locate the repository root from the current directory.
    pub fn root(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(repository::find_root(&cwd)?)
    }

    /// Manifest path to read, given the repository root.
    ///
    /// A relative `--manifest` is resolved against the root, not the
    /// current directory.
    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        match &self.manifest {
            Some(path) => root.join(path),
            None => defaults::manifest_path(root),
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Sync(args) => commands::sync::execute(args, &self.color),
            Commands::Plan(args) => commands::plan::execute(args),
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sync_defaults() {
        let cli = Cli::try_parse_from(["submodule-sync", "sync"]).unwrap();
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.manifest.output, PathBuf::from("libs"));
                assert_eq!(args.git, "git");
                assert_eq!(args.timeout, defaults::COMMAND_TIMEOUT_SECS);
                assert_eq!(args.log_level, "debug");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.color, "auto");
    }

    #[test]
    fn test_manifest_path_defaults_to_root() {
        let args = ManifestArgs {
            manifest: None,
            output: PathBuf::from("libs"),
        };
        assert_eq!(
            args.manifest_path(Path::new("/repo")),
            PathBuf::from("/repo/default.xml")
        );

        let explicit = ManifestArgs {
            manifest: Some(PathBuf::from("/elsewhere/other.xml")),
            ..args
        };
        assert_eq!(
            explicit.manifest_path(Path::new("/repo")),
            PathBuf::from("/elsewhere/other.xml")
        );
    }

    #[test]
    fn test_relative_manifest_resolves_against_root() {
        let args = ManifestArgs {
            manifest: Some(PathBuf::from("manifests/pinned.xml")),
            output: PathBuf::from("libs"),
        };
        assert_eq!(
            args.manifest_path(Path::new("/repo")),
            PathBuf::from("/repo/manifests/pinned.xml")
        );
    }
}
