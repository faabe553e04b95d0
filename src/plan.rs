//! # Reconciliation Plan
//!
//! The plan is the three-way diff between declared and registered paths:
//!
//! - `to_remove`: registered paths no project declares.
//! - `to_add`: declared projects whose path is not registered.
//! - `to_update`: declared projects whose path is already registered.
//!
//! `to_add` and `to_update` partition the declared projects, and no path is
//! ever in more than one of the three lists. The plan is a pure value; it
//! is computed once per run and never persisted.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::manifest::{Manifest, Project};
use crate::registry::Registry;

/// A retained submodule whose registered origin names a different project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginMismatch {
    pub path: String,
    pub registered_url: String,
    pub declared_origin: String,
}

impl fmt::Display for OriginMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is registered from {} but the manifest declares {}; updating in place",
            self.path, self.registered_url, self.declared_origin
        )
    }
}

/// Add/remove/update actions needed to make the registry match a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationPlan {
    /// Registered paths to remove, in registration order.
    pub to_remove: Vec<String>,
    /// Projects to register, in manifest order.
    pub to_add: Vec<Project>,
    /// Registered projects to move to their pinned revision, in manifest order.
    pub to_update: Vec<Project>,
    /// Retained paths whose registered origin disagrees with the manifest.
    pub origin_mismatches: Vec<OriginMismatch>,
}

impl ReconciliationPlan {
    /// Diff the manifest against a list of registered paths.
    pub fn compute(manifest: &Manifest, registered: &[String]) -> Self {
        let declared = manifest.paths();

        let mut to_remove = Vec::new();
        let mut seen = BTreeSet::new();
        for path in registered {
            if !declared.contains(path) && seen.insert(path.as_str()) {
                to_remove.push(path.clone());
            }
        }

        // Every declared path is absent from `to_remove` by construction,
        // so membership in `registered` alone decides add versus update.
        let (to_update, to_add): (Vec<Project>, Vec<Project>) = manifest
            .projects
            .iter()
            .cloned()
            .partition(|project| registered.contains(&project.path));

        Self {
            to_remove,
            to_add,
            to_update,
            origin_mismatches: Vec::new(),
        }
    }

    /// Diff the manifest against a registry, also flagging retained paths
    /// whose registered origin names a different project.
    pub fn from_registry(manifest: &Manifest, registry: &Registry) -> Self {
        let mut plan = Self::compute(manifest, &registry.paths());

        plan.origin_mismatches = plan
            .to_update
            .iter()
            .filter_map(|project| {
                let url = registry.block(&project.path)?.url()?;
                if origin_names(url) == project.name {
                    None
                } else {
                    Some(OriginMismatch {
                        path: project.path.clone(),
                        registered_url: url.to_string(),
                        declared_origin: project.origin(),
                    })
                }
            })
            .collect();

        plan
    }

    /// Returns true when nothing needs adding or removing.
    pub fn is_steady_state(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Returns true when the plan holds no actions at all.
    pub fn is_empty(&self) -> bool {
        self.is_steady_state() && self.to_update.is_empty()
    }
}

/// The project name an origin URL points at: its last path segment without
/// a `.git` suffix.
fn origin_names(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed)
}

impl fmt::Display for ReconciliationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Remove ({}):", self.to_remove.len())?;
        for path in &self.to_remove {
            writeln!(f, "  - {}", path)?;
        }
        writeln!(f, "Add ({}):", self.to_add.len())?;
        for project in &self.to_add {
            writeln!(
                f,
                "  + {} from {} at {}",
                project.path,
                project.origin(),
                project.revision
            )?;
        }
        writeln!(f, "Update ({}):", self.to_update.len())?;
        for project in &self.to_update {
            writeln!(f, "  ~ {} to {}", project.path, project.revision)?;
        }
        for mismatch in &self.origin_mismatches {
            writeln!(f, "warning: {}", mismatch)?;
        }
        Ok(())
    }
}
