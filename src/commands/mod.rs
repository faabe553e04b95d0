//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `submodule-sync` command-line tool. Each subcommand is defined in its own
//! file.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `submodule_sync` library.

pub mod completions;
pub mod plan;
pub mod sync;
pub mod validate;
