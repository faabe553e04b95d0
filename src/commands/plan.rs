//! # Plan Command Implementation
//!
//! Computes the reconciliation plan for the current repository and prints it
//! without running any git command or touching any file. The plan can be
//! printed as text or as JSON for scripting.

use anyhow::Result;
use clap::Args;

use submodule_sync::error::Error;
use submodule_sync::manifest;
use submodule_sync::plan::ReconciliationPlan;
use submodule_sync::registry::Registry;

use crate::cli::ManifestArgs;

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the plan command
pub fn execute(args: PlanArgs) -> Result<()> {
    let root = args.manifest.root()?;
    let manifest_path = args.manifest.manifest_path(&root);

    let manifest = manifest::from_file(&manifest_path, &args.manifest.output)?;
    let registry = Registry::read(&root)?;
    let plan = ReconciliationPlan::from_registry(&manifest, &registry);

    if args.json {
        let json = serde_json::to_string_pretty(&plan).map_err(|e| Error::Serialization {
            message: e.to_string(),
        })?;
        println!("{}", json);
        return Ok(());
    }

    print!("{}", plan);
    if plan.is_steady_state() {
        println!("Submodules already match the manifest; only revisions will be checked out.");
    }
    Ok(())
}
