//! # Submodule Sync CLI
//!
//! This is the binary entry point for the `submodule-sync` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Turning fatal errors and failed reconciliation actions into a non-zero
//!   exit status.
//!
//! The reconciliation logic lives in the `submodule_sync` library crate; the
//! binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
