//! # Submodule Sync Library
//!
//! This library reconciles the git submodules attached to a repository with
//! a declarative XML manifest. It is used by the `submodule-sync`
//! command-line tool but can be driven directly by other programs.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use submodule_sync::manifest;
//! use submodule_sync::plan::ReconciliationPlan;
//!
//! let xml = r#"
//! <manifest>
//!   <default revision="main"/>
//!   <project name="a"/>
//!   <project name="b" revision="v2"/>
//! </manifest>"#;
//! let manifest = manifest::parse(xml, Path::new("libs")).unwrap();
//!
//! let registered = vec!["libs/a".to_string(), "libs/c".to_string()];
//! let plan = ReconciliationPlan::compute(&manifest, &registered);
//!
//! assert_eq!(plan.to_remove, vec!["libs/c"]);
//! assert_eq!(plan.to_add[0].path, "libs/b");
//! assert_eq!(plan.to_update[0].revision, "main");
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: the declared projects, each with a name,
//!   a checkout path and a pinned revision.
//! - **Registry (`registry`)**: the submodules currently recorded in
//!   `.gitmodules`, held as structured blocks so one can be removed without
//!   disturbing the others.
//! - **Plan (`plan`)**: the remove/add/update diff between the two.
//! - **Execution (`process`, `git`)**: external commands run through the
//!   `CommandRunner` trait; failures are values, never panics or early
//!   returns.
//! - **Reconciler (`reconcile`)**: applies the plan in four phases and
//!   returns a `RunReport` (`report`) listing every outcome and failure.
//!
//! ## Execution Flow
//!
//! 1.  **Discovery**: find the repository root (`repository`).
//! 2.  **Load**: parse the manifest and read the registration file. Errors
//!     here are fatal and nothing is changed.
//! 3.  **Initialize**: materialise submodules git already knows about.
//! 4.  **Remove**: deinit and delete submodules no longer declared.
//! 5.  **Add**: register newly declared submodules and check them out.
//! 6.  **Update**: fetch and check out the pinned revision of the rest.
//! 7.  **Report**: summarise, with the run log (`logging`) holding the full
//!     audit trail.

pub mod defaults;
pub mod error;
pub mod git;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod path;
pub mod plan;
pub mod process;
pub mod reconcile;
pub mod registry;
pub mod report;
pub mod repository;

#[cfg(test)]
mod plan_proptest;
