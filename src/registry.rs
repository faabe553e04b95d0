//! # Submodule Registration File
//!
//! This module models the repository's `.gitmodules` file as a sequence of
//! structured blocks instead of loose lines.
//!
//! ```text
//! [submodule "libs/a"]          <- header, names the path
//!     path = libs/a             <- body lines, kept byte-for-byte
//!     url = ../a
//! [submodule "libs/b"]
//!     ...
//! ```
//!
//! Every block owns the exact bytes from its header up to the next header,
//! and any text before the first header is kept as a preamble. Removing a
//! submodule is therefore a filter over blocks followed by concatenation,
//! which leaves all other blocks byte-identical.
//!
//! A missing file is an empty registry. A file that exists but cannot be
//! read or contains an unparseable submodule header is a fatal
//! [`Error::RegistryRead`], since acting on it could remove the wrong
//! submodules.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::path;

/// File name of the registration file at the repository root.
pub const REGISTRATION_FILE: &str = ".gitmodules";

/// One `[submodule "..."]` section with its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleBlock {
    /// Normalised path named by the header.
    pub path: String,
    /// Header line followed by every body line, terminators included.
    lines: Vec<String>,
}

impl ModuleBlock {
    /// Value of a `key = value` entry in the block body, if present.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.lines.iter().skip(1).find_map(|line| {
            let (entry, value) = line.split_once('=')?;
            if entry.trim() == key {
                Some(value.trim())
            } else {
                None
            }
        })
    }

    /// The configured origin of the submodule.
    pub fn url(&self) -> Option<&str> {
        self.value("url")
    }
}

/// A parsed registration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    /// Text before the first header.
    preamble: Vec<String>,
    /// Sections in file order.
    blocks: Vec<ModuleBlock>,
}

impl Registry {
    /// Parse the text of a registration file.
    ///
    /// Returns a description of the first malformed header on failure. A
    /// header naming a path outside the repository is malformed too, since
    /// removing it would delete files the repository does not own.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let mut registry = Registry::default();

        for (index, line) in content.split_inclusive('\n').enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("[submodule") {
                let path = header_path(trimmed)
                    .ok_or_else(|| format!("line {}: malformed header {}", index + 1, trimmed))?;
                if path::escapes_root(&path) {
                    return Err(format!(
                        "line {}: submodule path '{}' is outside the repository",
                        index + 1,
                        path
                    ));
                }
                registry.blocks.push(ModuleBlock {
                    path,
                    lines: vec![line.to_string()],
                });
            } else if let Some(block) = registry.blocks.last_mut() {
                block.lines.push(line.to_string());
            } else {
                registry.preamble.push(line.to_string());
            }
        }

        Ok(registry)
    }

    /// Registered paths in file order, without repeats.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            if !paths.contains(&block.path) {
                paths.push(block.path.clone());
            }
        }
        paths
    }

    /// Returns true if a block is registered at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.block(path).is_some()
    }

    /// The block registered at `path`.
    pub fn block(&self, path: &str) -> Option<&ModuleBlock> {
        let path = path::normalize(path);
        self.blocks.iter().find(|block| block.path == path)
    }

    /// Number of registered blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if no submodule is registered.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Drop every block registered at `path`.
    ///
    /// Returns false and leaves the registry untouched when no block matches.
    pub fn remove(&mut self, path: &str) -> bool {
        let path = path::normalize(path);
        let before = self.blocks.len();
        self.blocks.retain(|block| block.path != path);
        self.blocks.len() != before
    }

    /// Path of the registration file under `root`.
    pub fn file_path(root: &Path) -> PathBuf {
        root.join(REGISTRATION_FILE)
    }

    /// Read the registration file under `root`.
    ///
    /// A missing file yields an empty registry.
    pub fn read(root: &Path) -> Result<Self> {
        let file = Self::file_path(root);
        let content = match fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No registration file at {}", file.display());
                return Ok(Registry::default());
            }
            Err(e) => {
                return Err(Error::RegistryRead {
                    path: file,
                    message: e.to_string(),
                })
            }
        };

        Self::parse(&content).map_err(|message| Error::RegistryRead {
            path: file,
            message,
        })
    }

    /// Write the registry back to the registration file under `root`.
    pub fn write(&self, root: &Path) -> Result<()> {
        fs::write(Self::file_path(root), self.to_string())?;
        Ok(())
    }
}

impl std::fmt::Display for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.preamble {
            f.write_str(line)?;
        }
        for block in &self.blocks {
            for line in &block.lines {
                f.write_str(line)?;
            }
        }
        Ok(())
    }
}

/// Extract the quoted name from `[submodule "name"]`.
fn header_path(header: &str) -> Option<String> {
    let inner = header.strip_prefix('[')?.strip_suffix(']')?;
    let quoted = inner.strip_prefix("submodule")?.trim();
    let name = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let name = path::normalize(name);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Read the set of registered submodule paths under `root`.
pub fn registered_paths(root: &Path) -> Result<Vec<String>> {
    Ok(Registry::read(root)?.paths())
}
