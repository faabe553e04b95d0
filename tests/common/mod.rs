//! Shared test utilities for CLI end-to-end tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_registered(&["libs/a"]);
//!     fixture.sync().assert().success();
//! }
//! ```
//!
//! Sync tests substitute the `true` and `false` utilities for git, so no
//! real repository, network or git installation is needed. With `true`
//! every git step succeeds and only the in-process steps (directory
//! removal, registration-file rewrite) have real effects.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Manifest documents used across tests.
#[allow(dead_code)]
pub mod manifests {
    /// Declares `a` (inheriting `main`) and `b` at `v2`.
    pub const A_AND_B: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest>
  <default revision="main"/>
  <project name="a"/>
  <project name="b" revision="v2"/>
</manifest>
"#;

    /// Declares only `a` at `v1`.
    pub const ONLY_A: &str = r#"<manifest>
  <project name="a" revision="v1"/>
</manifest>
"#;

    /// Declares nothing.
    pub const EMPTY: &str = "<manifest/>\n";

    /// A project without any revision.
    pub const MISSING_REVISION: &str = r#"<manifest>
  <project name="a"/>
</manifest>
"#;

    /// Two projects sharing a path.
    pub const DUPLICATE_PATH: &str = r#"<manifest>
  <default revision="main"/>
  <project name="a" path="shared"/>
  <project name="b" path="shared"/>
</manifest>
"#;

    /// Not well-formed XML.
    pub const MALFORMED: &str = "<manifest><project name=\"a\">\n";
}

/// A throwaway repository root: a temp directory with a `.git` directory.
pub struct TestFixture {
    pub temp: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(".git/modules").create_dir_all().unwrap();
        Self { temp }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write `default.xml` at the repository root.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp.child("default.xml").write_str(content).unwrap();
        self
    }

    /// Register each path in `.gitmodules` and create its checkout (with the
    /// `.git` pointer file git leaves there) and metadata directories.
    pub fn with_registered(self, paths: &[&str]) -> Self {
        let content = gitmodules(paths);
        self.temp.child(".gitmodules").write_str(&content).unwrap();
        for path in paths {
            let checkout = self.temp.child(path);
            checkout.create_dir_all().unwrap();
            checkout.child("README.md").write_str("checkout").unwrap();
            checkout
                .child(".git")
                .write_str(&format!("gitdir: ../.git/modules/{path}\n"))
                .unwrap();
            self.temp
                .child(".git/modules")
                .child(path)
                .create_dir_all()
                .unwrap();
        }
        self
    }

    pub fn log_file(&self) -> PathBuf {
        self.temp.path().join("run.log")
    }

    pub fn gitmodules(&self) -> String {
        std::fs::read_to_string(self.temp.path().join(".gitmodules")).unwrap()
    }

    /// A `sync` command using `git` as the git program.
    pub fn sync_with(&self, git: &str) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("submodule-sync");
        cmd.current_dir(self.path())
            .env_remove("SUBMODULE_SYNC_MANIFEST")
            .env_remove("SUBMODULE_SYNC_TIMEOUT")
            .arg("--color")
            .arg("never")
            .arg("sync")
            .arg("--git")
            .arg(git)
            .arg("--log-file")
            .arg(self.log_file());
        cmd
    }

    /// A `sync` command where every git step succeeds.
    pub fn sync(&self) -> assert_cmd::Command {
        self.sync_with("true")
    }

    /// Any other subcommand, run from the repository root.
    pub fn command(&self, subcommand: &str) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("submodule-sync");
        cmd.current_dir(self.path())
            .env_remove("SUBMODULE_SYNC_MANIFEST")
            .arg("--color")
            .arg("never")
            .arg(subcommand);
        cmd
    }
}

/// Registration-file text with one block per path, in the layout git writes.
pub fn gitmodules(paths: &[&str]) -> String {
    paths
        .iter()
        .map(|path| {
            let name = path.rsplit('/').next().unwrap();
            format!("[submodule \"{path}\"]\n\tpath = {path}\n\turl = ../{name}\n")
        })
        .collect()
}
