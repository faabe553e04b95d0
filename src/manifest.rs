//! # Manifest Parsing
//!
//! This module reads the XML manifest that declares which external projects
//! should be attached to the repository as submodules.
//!
//! ## Document shape
//!
//! ```xml
//! <manifest>
//!   <default revision="main"/>
//!   <project name="core"/>
//!   <project name="tools" path="vendor/tools" revision="v1.2.0"/>
//! </manifest>
//! ```
//!
//! - At most one `<default>` element may supply a `revision`.
//! - Each `<project>` needs a `name`. `path` defaults to the name and
//!   `revision` falls back to the document default.
//! - The stored path is the output directory joined with the project path,
//!   normalised to slash-separated form.
//!
//! Parsing is split from validation: every problem in the document is
//! collected and reported together in [`Error::ManifestValidation`], and no
//! reconciliation starts while any problem remains.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use xot::{Node, Xot};

use crate::error::{Error, Result};
use crate::path;

/// A declared external project, resolved against the document defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    /// Identifier of the project, used to derive its origin.
    pub name: String,
    /// Repository-relative checkout location; the reconciliation key.
    pub path: String,
    /// Revision the checkout must be set to.
    pub revision: String,
}

impl Project {
    /// The sibling-relative origin the submodule is added from.
    pub fn origin(&self) -> String {
        format!("../{}", self.name)
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Project {} at {} with revision {}",
            self.name, self.path, self.revision
        )
    }
}

/// A parsed and validated manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    /// Revision inherited by projects that do not declare their own.
    pub default_revision: Option<String>,
    /// Declared projects in document order.
    pub projects: Vec<Project>,
}

impl Manifest {
    /// The set of declared checkout paths.
    pub fn paths(&self) -> BTreeSet<String> {
        self.projects.iter().map(|p| p.path.clone()).collect()
    }

    /// Look up the project declared at `path`.
    pub fn project_at(&self, path: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.path == path)
    }
}

/// A `<project>` element as written, before defaults are applied.
#[derive(Debug, Default)]
struct Declaration {
    name: Option<String>,
    path: Option<String>,
    revision: Option<String>,
}

/// Element and attribute names the parser looks for.
struct Names {
    default: xot::NameId,
    project: xot::NameId,
    name: xot::NameId,
    path: xot::NameId,
    revision: xot::NameId,
}

impl Names {
    fn register(xot: &mut Xot) -> Self {
        Self {
            default: xot.add_name("default"),
            project: xot.add_name("project"),
            name: xot.add_name("name"),
            path: xot.add_name("path"),
            revision: xot.add_name("revision"),
        }
    }
}

/// Load and validate a manifest file.
///
/// Fails with [`Error::ManifestNotFound`] when the file is missing, before
/// any parsing takes place.
pub fn from_file(manifest_path: &Path, output_dir: &Path) -> Result<Manifest> {
    if !manifest_path.is_file() {
        return Err(Error::ManifestNotFound {
            path: manifest_path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(manifest_path).map_err(|e| Error::ManifestParse {
        path: manifest_path.to_path_buf(),
        message: e.to_string(),
    })?;

    parse_document(&content, output_dir, manifest_path)
}

/// Parse and validate manifest text that did not come from a file.
pub fn parse(content: &str, output_dir: &Path) -> Result<Manifest> {
    parse_document(content, output_dir, &PathBuf::from("<inline>"))
}

fn parse_document(content: &str, output_dir: &Path, source: &Path) -> Result<Manifest> {
    let parse_error = |message: String| Error::ManifestParse {
        path: source.to_path_buf(),
        message,
    };

    let mut xot = Xot::new();
    let names = Names::register(&mut xot);
    let document = xot.parse(content).map_err(|e| parse_error(e.to_string()))?;
    let root = xot
        .document_element(document)
        .map_err(|e| parse_error(e.to_string()))?;

    let mut problems = Vec::new();
    let mut defaults = Vec::new();
    let mut declarations = Vec::new();

    for child in xot.children(root) {
        let Some(element) = xot.element(child) else {
            continue;
        };
        if element.name() == names.default {
            defaults.push(attribute(&xot, child, names.revision));
        } else if element.name() == names.project {
            declarations.push(Declaration {
                name: attribute(&xot, child, names.name),
                path: attribute(&xot, child, names.path),
                revision: attribute(&xot, child, names.revision),
            });
        }
    }

    if defaults.len() > 1 {
        problems.push(format!(
            "expected at most one <default> element, found {}",
            defaults.len()
        ));
    }
    let default_revision = defaults.into_iter().next().flatten();
    debug!("Default revision: {:?}", default_revision);

    let projects = resolve(declarations, default_revision.as_deref(), output_dir, &mut problems);

    if !problems.is_empty() {
        return Err(Error::ManifestValidation {
            path: source.to_path_buf(),
            problems,
        });
    }

    Ok(Manifest {
        default_revision,
        projects,
    })
}

/// Non-empty attribute value, trimmed.
fn attribute(xot: &Xot, node: Node, name: xot::NameId) -> Option<String> {
    xot.get_attribute(node, name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Apply defaults to each declaration and record every problem found.
fn resolve(
    declarations: Vec<Declaration>,
    default_revision: Option<&str>,
    output_dir: &Path,
    problems: &mut Vec<String>,
) -> Vec<Project> {
    let mut projects = Vec::with_capacity(declarations.len());
    let mut seen: HashMap<String, String> = HashMap::new();

    for (index, declaration) in declarations.into_iter().enumerate() {
        let Some(name) = declaration.name else {
            problems.push(format!("project #{} has no name", index + 1));
            continue;
        };

        let relative = declaration.path.unwrap_or_else(|| name.clone());
        let resolved = path::join_relative(output_dir, &relative);
        if path::escapes_root(&resolved) {
            problems.push(format!(
                "project '{}' has path '{}' outside the repository",
                name, resolved
            ));
            continue;
        }

        let Some(revision) = declaration
            .revision
            .or_else(|| default_revision.map(str::to_string))
        else {
            problems.push(format!(
                "project '{}' has no revision and the manifest declares no default",
                name
            ));
            continue;
        };

        if let Some(previous) = seen.insert(resolved.clone(), name.clone()) {
            problems.push(format!(
                "path '{}' is declared by both '{}' and '{}'",
                resolved, previous, name
            ));
            continue;
        }

        projects.push(Project {
            name,
            path: resolved,
            revision,
        });
    }

    projects
}
