//! Version-control operations issued by the reconciler.
//!
//! Each [`GitCommand`] knows the arguments it needs and the directory it
//! must run in. Turning a command into a [`CommandSpec`] is kept separate
//! from running it so the reconciler can be tested against a mock runner.

use std::path::Path;

use crate::process::CommandSpec;

/// Program used when no other git binary is configured.
pub const DEFAULT_GIT: &str = "git";

/// A submodule operation against the repository or one of its checkouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    /// Materialise submodules already known to the repository metadata.
    SubmoduleInit,
    /// Detach the submodule at `path` from the working tree.
    SubmoduleDeinit { path: String },
    /// Register a new submodule cloned from `origin` at `path`.
    SubmoduleAdd { origin: String, path: String },
    /// Fetch tags and refs inside the checkout at `path`.
    FetchTags { path: String },
    /// Check out `revision` inside the checkout at `path`.
    Checkout { path: String, revision: String },
}

impl GitCommand {
    /// Arguments passed to git.
    pub fn args(&self) -> Vec<String> {
        let args: Vec<&str> = match self {
            GitCommand::SubmoduleInit => vec!["submodule", "update", "--init"],
            GitCommand::SubmoduleDeinit { path } => {
                vec!["submodule", "deinit", "-f", path.as_str()]
            }
            GitCommand::SubmoduleAdd { origin, path } => {
                vec!["submodule", "add", origin.as_str(), path.as_str()]
            }
            GitCommand::FetchTags { .. } => vec!["fetch", "--tags"],
            GitCommand::Checkout { revision, .. } => vec!["checkout", revision.as_str()],
        };
        args.into_iter().map(str::to_string).collect()
    }

    /// Repository-relative directory the command runs in; `None` means the
    /// repository root.
    pub fn working_dir(&self) -> Option<&str> {
        match self {
            GitCommand::FetchTags { path } | GitCommand::Checkout { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Build the runnable command using `git` as the program.
    pub fn to_spec(&self, git: &str, root: &Path) -> CommandSpec {
        let cwd = match self.working_dir() {
            Some(dir) => root.join(dir),
            None => root.to_path_buf(),
        };
        CommandSpec::new(git, cwd).args(self.args())
    }
}
