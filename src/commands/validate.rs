//! # Validate Command Implementation
//!
//! Parses the manifest and applies every resolution rule that `sync` would
//! apply, without looking at the registration file or running git. Missing
//! revisions, duplicate paths, paths escaping the repository and malformed
//! XML are all reported here.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;

use submodule_sync::manifest;
use submodule_sync::output::{emoji, OutputConfig};

use crate::cli::ManifestArgs;

/// Validate a manifest file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,
}

/// Execute the `validate` command.
///
/// An explicit `--manifest` is validated even outside a repository, relative
/// to the current directory there; the default manifest needs the
/// repository root to be found.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let manifest_path = match args.manifest.root() {
        Ok(root) => args.manifest.manifest_path(&root),
        Err(e) => args.manifest.manifest.clone().ok_or(e)?,
    };

    println!(
        "{} Validating manifest: {}",
        emoji(&out, "🔍", "[SCAN]"),
        manifest_path.display()
    );

    let manifest = match manifest::from_file(&manifest_path, &args.manifest.output) {
        Ok(manifest) => manifest,
        Err(e) => {
            println!("{} Manifest is invalid", emoji(&out, "❌", "[ERR]"));
            return Err(e.into());
        }
    };

    println!("{} Manifest is valid", emoji(&out, "✅", "[OK]"));
    println!("\n{} Manifest Summary:", emoji(&out, "📊", "[INFO]"));
    println!(
        "   Default revision: {}",
        manifest.default_revision.as_deref().unwrap_or("(none)")
    );
    println!("   Projects: {}", manifest.projects.len());
    for project in &manifest.projects {
        println!("   - {}", project);
    }

    Ok(())
}
