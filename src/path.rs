//! Path normalisation utilities for submodule-sync
//!
//! Manifest paths and registration-file paths are compared as plain strings,
//! so both sides are reduced to one canonical, slash-separated form first.

use std::path::Path;

/// Normalise a repository-relative path to canonical slash-separated form.
///
/// Backslashes become slashes, empty and `.` components are dropped and
/// trailing separators are removed. `..` components are kept as-is so that
/// validation can reject them.
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');
    let parts: Vec<&str> = unified
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Join a per-project relative path onto the output directory and normalise
/// the result.
pub fn join_relative(output_dir: &Path, relative: &str) -> String {
    let base = normalize(&output_dir.to_string_lossy());
    let relative = normalize(relative);

    if base.is_empty() {
        relative
    } else if relative.starts_with('/') {
        relative
    } else {
        format!("{}/{}", base, relative)
    }
}

/// Returns true when a normalised path escapes the repository.
pub fn escapes_root(path: &str) -> bool {
    path.is_empty()
        || path.starts_with('/')
        || has_drive_prefix(path)
        || path.split('/').any(|part| part == "..")
}

/// `C:` style prefixes name a location outside any repository.
fn has_drive_prefix(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_plain() {
        assert_eq!(normalize("libs/a"), "libs/a");
    }

    #[test]
    fn test_normalize_windows_separators() {
        assert_eq!(normalize("libs\\nested\\a"), "libs/nested/a");
    }

    #[test]
    fn test_normalize_redundant_components() {
        assert_eq!(normalize("./libs//a/./"), "libs/a");
    }

    #[test]
    fn test_normalize_keeps_absolute_marker() {
        assert_eq!(normalize("/opt/libs/a"), "/opt/libs/a");
    }

    #[test]
    fn test_join_relative() {
        assert_eq!(join_relative(&PathBuf::from("libs"), "a"), "libs/a");
        assert_eq!(join_relative(&PathBuf::from("libs/"), "./a/b"), "libs/a/b");
    }

    #[test]
    fn test_join_relative_empty_output_dir() {
        assert_eq!(join_relative(&PathBuf::from(""), "a"), "a");
        assert_eq!(join_relative(&PathBuf::from("."), "a"), "a");
    }

    #[test]
    fn test_join_relative_absolute_project_path_wins() {
        assert_eq!(join_relative(&PathBuf::from("libs"), "/abs/a"), "/abs/a");
    }

    #[test]
    fn test_escapes_root() {
        assert!(escapes_root("../a"));
        assert!(escapes_root("libs/../../a"));
        assert!(escapes_root("/abs"));
        assert!(escapes_root(""));
        assert!(!escapes_root("libs/a"));
        assert!(!escapes_root("libs/a..b"));
        assert!(escapes_root("C:/libs/a"));
        assert!(!escapes_root("libs/c:d"));
    }
}
