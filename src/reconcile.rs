//! # Reconciler
//!
//! The reconciler converges the registered submodules onto a manifest in
//! four ordered phases:
//!
//! 1. **Initialize**: `git submodule update --init`, so every submodule the
//!    repository already knows about is materialised before diffing.
//! 2. **Remove**: for each orphaned path, deinit it, delete its working tree,
//!    delete its metadata under `.git/modules`, then drop its block from the
//!    registration file.
//! 3. **Add**: for each new project, `git submodule add ../<name> <path>`
//!    followed by a checkout of the pinned revision.
//! 4. **Update**: for each retained project, fetch tags and check out the
//!    pinned revision.
//!
//! Removing first means a path reused by a different project is free by the
//! time it is added, and the registration file is already pruned when new
//! entries are written.
//!
//! ## Failure model
//!
//! Every step is best-effort. Each phase returns a [`PhaseOutcome`] that
//! accumulates action outcomes, failures and warnings; nothing inside a
//! phase returns early, so one failing submodule never stops work on
//! another. The run always completes all four phases and the caller reads
//! [`RunReport::has_failures`] to decide the exit status.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::git::{GitCommand, DEFAULT_GIT};
use crate::manifest::{Manifest, Project};
use crate::path;
use crate::plan::ReconciliationPlan;
use crate::process::{ActionOutcome, CommandRunner};
use crate::registry::Registry;
use crate::report::{Failure, Phase, RunReport, Warning};
use crate::repository;

/// Receives progress notifications while a run executes.
///
/// All methods default to doing nothing.
pub trait Observer {
    fn phase_started(&mut self, _phase: Phase) {}
    fn action_started(&mut self, _phase: Phase, _subject: &str) {}
    fn action_finished(&mut self, _outcome: &ActionOutcome) {}
}

/// An observer that ignores every notification.
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Outcomes, failures and warnings gathered by one phase.
#[must_use = "a phase outcome must be merged into the run report"]
#[derive(Debug)]
pub struct PhaseOutcome {
    pub phase: Phase,
    pub outcomes: Vec<ActionOutcome>,
    pub failures: Vec<Failure>,
    pub warnings: Vec<Warning>,
}

impl PhaseOutcome {
    fn new(phase: Phase) -> Self {
        Self {
            phase,
            outcomes: Vec::new(),
            failures: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Keep an outcome, turning it into a failure when it did not succeed.
    fn record(&mut self, path: Option<&str>, outcome: ActionOutcome) -> bool {
        let success = outcome.success;
        if !success {
            self.failures.push(Failure {
                phase: self.phase,
                path: path.map(str::to_string),
                outcome: outcome.clone(),
            });
        }
        self.outcomes.push(outcome);
        success
    }

    fn warn(&mut self, path: &str, message: String) {
        warn!("{}: {}", path, message);
        self.warnings.push(Warning {
            phase: self.phase,
            path: path.to_string(),
            message,
        });
    }
}

impl RunReport {
    /// Merge one phase's results into the report.
    pub fn absorb(&mut self, phase: PhaseOutcome) {
        self.outcomes.extend(phase.outcomes);
        self.failures.extend(phase.failures);
        self.warnings.extend(phase.warnings);
    }
}

/// Drives the four reconciliation phases through a [`CommandRunner`].
pub struct Reconciler<'a, R: CommandRunner> {
    runner: &'a R,
    root: PathBuf,
    git: String,
}

impl<'a, R: CommandRunner> Reconciler<'a, R> {
    /// A reconciler for the repository at `root` that runs `git` from PATH.
    pub fn new(runner: &'a R, root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            root: root.into(),
            git: DEFAULT_GIT.to_string(),
        }
    }

    /// Use a different git program.
    pub fn with_git(mut self, git: impl Into<String>) -> Self {
        self.git = git.into();
        self
    }

    /// Execute a full run. Always completes all four phases.
    pub fn run(
        &self,
        manifest: &Manifest,
        mut registry: Registry,
        observer: &mut dyn Observer,
    ) -> RunReport {
        for path in registry.paths() {
            debug!("Existing submodule {}", path);
        }
        for project in &manifest.projects {
            debug!(
                "Manifest Project {} to {} at {}",
                project.name, project.path, project.revision
            );
        }

        let plan = ReconciliationPlan::from_registry(manifest, &registry);
        debug!("Reconciliation plan:\n{}", plan);

        let mut report = RunReport::default();
        let mut registered: BTreeSet<String> = registry.paths().into_iter().collect();

        report.absorb(self.initialize(observer));
        report.absorb(self.remove(&plan.to_remove, &mut registry, &mut registered, observer));
        report.absorb(self.add(&plan.to_add, &mut registered, observer));

        let retained: Vec<&Project> = plan
            .to_update
            .iter()
            .filter(|project| registered.contains(&project.path))
            .collect();
        let mut update = self.update(&retained, observer);
        for mismatch in &plan.origin_mismatches {
            update.warn(&mismatch.path, mismatch.to_string());
        }
        report.absorb(update);

        report.plan = plan;
        report
    }

    fn git(&self, command: GitCommand) -> ActionOutcome {
        self.runner.run(&command.to_spec(&self.git, &self.root))
    }

    /// Run a command that belongs inside the checkout at `path`.
    ///
    /// Without a `.git` entry in that directory git would resolve the
    /// enclosing repository instead, so the command fails without being
    /// issued.
    fn git_in_checkout(&self, path: &str, command: GitCommand) -> ActionOutcome {
        let spec = command.to_spec(&self.git, &self.root);
        if is_checkout(&spec.cwd) {
            return self.runner.run(&spec);
        }
        ActionOutcome::from_io(
            spec.command_line(),
            &spec.cwd,
            Err(io::Error::new(
                ErrorKind::NotFound,
                format!("{} is not a checked-out submodule (no .git entry)", path),
            )),
        )
    }

    fn notify(
        &self,
        observer: &mut dyn Observer,
        phase: &mut PhaseOutcome,
        path: Option<&str>,
        outcome: ActionOutcome,
    ) -> bool {
        observer.action_finished(&outcome);
        phase.record(path, outcome)
    }

    /// Phase 1: materialise known submodules.
    pub fn initialize(&self, observer: &mut dyn Observer) -> PhaseOutcome {
        let mut phase = PhaseOutcome::new(Phase::Initialize);
        observer.phase_started(Phase::Initialize);
        info!("Initializing submodules");

        let outcome = self.git(GitCommand::SubmoduleInit);
        self.notify(observer, &mut phase, None, outcome);
        phase
    }

    /// Phase 2: detach and delete every path in `paths`.
    ///
    /// Each removed path is dropped from `registered` whatever its individual
    /// steps returned, so later phases never act on it.
    pub fn remove(
        &self,
        paths: &[String],
        registry: &mut Registry,
        registered: &mut BTreeSet<String>,
        observer: &mut dyn Observer,
    ) -> PhaseOutcome {
        let mut phase = PhaseOutcome::new(Phase::Remove);
        observer.phase_started(Phase::Remove);

        for path in paths {
            observer.action_started(Phase::Remove, path);
            info!("Removing submodule {}", path);

            if path::escapes_root(path) {
                let outcome = ActionOutcome::from_io(
                    format!("remove submodule {}", path),
                    &self.root,
                    Err(io::Error::new(
                        ErrorKind::InvalidInput,
                        format!("refusing to remove '{}' outside the repository", path),
                    )),
                );
                self.notify(observer, &mut phase, Some(path), outcome);
                continue;
            }

            let deinit = self.git(GitCommand::SubmoduleDeinit { path: path.clone() });
            self.notify(observer, &mut phase, Some(path), deinit);

            let tree = self.root.join(path);
            let outcome = ActionOutcome::from_io(
                format!("remove working tree {}", path),
                &self.root,
                remove_dir_if_present(&tree),
            );
            self.notify(observer, &mut phase, Some(path), outcome);

            let metadata = repository::git_dir(&self.root).join("modules").join(path);
            let outcome = ActionOutcome::from_io(
                format!("remove metadata {}", metadata.display()),
                &self.root,
                remove_dir_if_present(&metadata),
            );
            self.notify(observer, &mut phase, Some(path), outcome);

            if registry.remove(path) {
                let file = Registry::file_path(&self.root);
                let outcome = ActionOutcome::from_io(
                    format!("rewrite {} without {}", file.display(), path),
                    &self.root,
                    registry.write(&self.root).map_err(std::io::Error::other),
                );
                self.notify(observer, &mut phase, Some(path), outcome);
            } else {
                phase.warn(
                    path,
                    "no declaration block found in the registration file; left unchanged"
                        .to_string(),
                );
            }

            registered.remove(path);
        }

        phase
    }

    /// Phase 3: register each project and check out its revision.
    pub fn add(
        &self,
        projects: &[Project],
        registered: &mut BTreeSet<String>,
        observer: &mut dyn Observer,
    ) -> PhaseOutcome {
        let mut phase = PhaseOutcome::new(Phase::Add);
        observer.phase_started(Phase::Add);

        for project in projects {
            let origin = project.origin();
            observer.action_started(Phase::Add, &origin);
            info!("Adding submodule {} to {}", origin, project.path);

            let add = self.git(GitCommand::SubmoduleAdd {
                origin,
                path: project.path.clone(),
            });
            if self.notify(observer, &mut phase, Some(&project.path), add) {
                registered.insert(project.path.clone());
            }

            // Attempted even after a failed add; it then fails on its own
            // and is recorded like any other step.
            let checkout = self.git_in_checkout(
                &project.path,
                GitCommand::Checkout {
                    path: project.path.clone(),
                    revision: project.revision.clone(),
                },
            );
            self.notify(observer, &mut phase, Some(&project.path), checkout);
        }

        phase
    }

    /// Phase 4: move each retained project to its pinned revision.
    pub fn update(&self, projects: &[&Project], observer: &mut dyn Observer) -> PhaseOutcome {
        let mut phase = PhaseOutcome::new(Phase::Update);
        observer.phase_started(Phase::Update);

        for project in projects {
            observer.action_started(Phase::Update, &project.path);
            info!("Updating submodule {}", project.path);

            let fetch = self.git_in_checkout(
                &project.path,
                GitCommand::FetchTags {
                    path: project.path.clone(),
                },
            );
            self.notify(observer, &mut phase, Some(&project.path), fetch);

            let checkout = self.git_in_checkout(
                &project.path,
                GitCommand::Checkout {
                    path: project.path.clone(),
                    revision: project.revision.clone(),
                },
            );
            self.notify(observer, &mut phase, Some(&project.path), checkout);
        }

        phase
    }
}

/// A submodule checkout carries its own `.git` file or directory.
fn is_checkout(dir: &Path) -> bool {
    dir.join(".git").symlink_metadata().is_ok()
}

/// `rm -rf` semantics: a directory that is already gone is not an error.
fn remove_dir_if_present(dir: &Path) -> std::io::Result<()> {
    match fs::remove_dir_all(dir) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
