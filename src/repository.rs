//! # Repository Discovery
//!
//! Locates the parent repository that submodules are attached to.
//!
//! The root is the nearest ancestor of the starting directory that contains
//! a `.git` entry. That entry is usually a directory, but for worktrees and
//! nested checkouts it is a file holding a `gitdir: <path>` pointer, which
//! [`git_dir`] follows so submodule metadata is looked up in the right place.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// Walk up from `start` to the first directory containing `.git`.
pub fn find_root(start: &Path) -> Result<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            debug!("Found repository root at {}", dir.display());
            return Ok(dir.to_path_buf());
        }
        current = dir.parent();
    }

    Err(Error::RepositoryRootNotFound {
        start: start.to_path_buf(),
    })
}

/// Directory holding the repository's git metadata.
///
/// Follows a `gitdir:` pointer file when `.git` is not a directory. Relative
/// pointers are resolved against `root`.
pub fn git_dir(root: &Path) -> PathBuf {
    let dot_git = root.join(".git");
    if dot_git.is_file() {
        if let Ok(content) = fs::read_to_string(&dot_git) {
            if let Some(target) = content.trim().strip_prefix("gitdir:") {
                let target = PathBuf::from(target.trim());
                return if target.is_absolute() {
                    target
                } else {
                    root.join(target)
                };
            }
        }
    }
    dot_git
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_root_from_nested_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        let nested = temp.path().join("src/deep/er");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_root(&nested).unwrap(), temp.path());
    }

    #[test]
    fn test_find_root_at_start() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        assert_eq!(find_root(temp.path()).unwrap(), temp.path());
    }

    #[test]
    fn test_find_root_accepts_git_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".git"), "gitdir: ../main/.git/worktrees/x\n").unwrap();
        assert_eq!(find_root(temp.path()).unwrap(), temp.path());
    }

    #[test]
    fn test_git_dir_plain_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        assert_eq!(git_dir(temp.path()), temp.path().join(".git"));
    }

    #[test]
    fn test_git_dir_follows_relative_pointer() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".git"), "gitdir: ../main/.git\n").unwrap();
        assert_eq!(git_dir(temp.path()), temp.path().join("../main/.git"));
    }

    #[test]
    fn test_git_dir_follows_absolute_pointer() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".git"), "gitdir: /srv/repos/main.git").unwrap();
        assert_eq!(git_dir(temp.path()), PathBuf::from("/srv/repos/main.git"));
    }
}
