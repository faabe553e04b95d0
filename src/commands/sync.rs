//! # Sync Command Implementation
//!
//! `sync` is the reconciliation run itself:
//!
//! 1. Locate the repository root and open a fresh log file.
//! 2. Load and validate the manifest; read the registration file. Any
//!    problem here aborts the run before anything is changed.
//! 3. Create the output folder if it is missing.
//! 4. Run the four reconciliation phases, printing progress as they go.
//! 5. Print the summary and fail the process if any action failed.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use submodule_sync::git::DEFAULT_GIT;
use submodule_sync::manifest;
use submodule_sync::output::{action_line, emoji, phase_banner, OutputConfig};
use submodule_sync::process::{ActionOutcome, SystemRunner};
use submodule_sync::reconcile::{Observer, Reconciler};
use submodule_sync::registry::Registry;
use submodule_sync::report::Phase;
use submodule_sync::{defaults, logging};

use crate::cli::ManifestArgs;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Git program to run
    #[arg(long, value_name = "PROGRAM", env = "SUBMODULE_SYNC_GIT", default_value = DEFAULT_GIT)]
    pub git: String,

    /// Seconds a single git command may run before it is killed (0 disables)
    #[arg(long, value_name = "SECS", env = "SUBMODULE_SYNC_TIMEOUT", default_value_t = defaults::COMMAND_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Where to write the run log (defaults to ~/submodule_setup.log)
    #[arg(long, value_name = "FILE", env = "SUBMODULE_SYNC_LOG")]
    pub log_file: Option<PathBuf>,

    /// Lowest level written to the run log (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "debug")]
    pub log_level: String,

    /// Only print failures and the final summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Prints phase banners and per-action progress to the terminal.
struct ConsoleProgress {
    out: OutputConfig,
}

impl Observer for ConsoleProgress {
    fn phase_started(&mut self, phase: Phase) {
        if !self.out.quiet {
            println!("\n{}\n", phase_banner(&self.out, phase));
        }
    }

    fn action_started(&mut self, phase: Phase, subject: &str) {
        if !self.out.quiet {
            println!("{}", action_line(&self.out, phase, subject));
        }
    }

    fn action_finished(&mut self, outcome: &ActionOutcome) {
        if outcome.success {
            if !self.out.quiet {
                println!("Running command: {}", outcome.command);
                let stdout = outcome.stdout.trim_end();
                if !stdout.is_empty() {
                    println!("{}", stdout);
                }
            }
        } else {
            eprintln!(
                "{} Error running command: {}\n\t{}",
                emoji(&self.out, "❌", "[ERR]"),
                outcome.command,
                outcome.stderr.trim_end()
            );
        }
    }
}

/// Execute the sync command
pub fn execute(args: SyncArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag).quiet(args.quiet);

    let root = args.manifest.root()?;
    let manifest_path = args.manifest.manifest_path(&root);

    let log_file = args.log_file.clone().unwrap_or_else(defaults::log_file);
    let level = logging::parse_level(&args.log_level)?;
    logging::init_file_logger(&log_file, level)?;
    log::info!("Repository root: {}", root.display());
    log::info!("Manifest: {}", manifest_path.display());

    if !out.quiet {
        println!("Found project root at {}", root.display());
        println!("Using manifest file at {}", manifest_path.display());
        println!("Using output folder at {}", args.manifest.output.display());
    }

    let manifest = manifest::from_file(&manifest_path, &args.manifest.output)?;
    let registry = Registry::read(&root)?;

    let output_dir = root.join(&args.manifest.output);
    if !output_dir.exists() {
        if !out.quiet {
            println!(
                "Output folder {} does not exist. Creating it.",
                args.manifest.output.display()
            );
        }
        fs::create_dir_all(&output_dir)?;
    }

    let runner = SystemRunner::new(defaults::command_timeout(args.timeout));
    let reconciler = Reconciler::new(&runner, &root).with_git(args.git.as_str());
    let mut progress = ConsoleProgress { out: out.clone() };

    let mut report = reconciler.run(&manifest, registry, &mut progress);
    report.log_file = Some(log_file);
    report.log_summary();

    let summary = report.render_summary(&out);
    println!();
    if report.has_failures() {
        eprint!("{}", summary);
        anyhow::bail!(
            "{} reconciliation action(s) failed",
            report.failures.len()
        );
    }

    print!("{}", summary);
    log::info!("All submodules updated successfully");
    Ok(())
}
