//! Resolution of user-supplied paths to absolute scan roots.

use directories::BaseDirs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScanError};

/// Expand a user-supplied path to an absolute path.
///
/// A leading `~` is replaced with the invoking user's home directory.
/// Relative paths are joined onto `base` when given, otherwise onto the
/// current working directory. The path is not required to exist.
pub fn expand_path(input: &str, base: Option<&Path>) -> Result<PathBuf> {
    let expanded = if input == "~" {
        home_dir()?
    } else if let Some(rest) = input.strip_prefix("~/") {
        home_dir()?.join(rest)
    } else {
        PathBuf::from(input)
    };

    if expanded.is_absolute() {
        return Ok(expanded);
    }

    let base = match base {
        Some(b) => b.to_path_buf(),
        None => std::env::current_dir().map_err(|source| ScanError::Io {
            path: PathBuf::from("."),
            source,
        })?,
    };
    Ok(base.join(expanded))
}

/// Expand `input` and check that it names an existing directory.
pub fn resolve_root(input: &str, base: Option<&Path>) -> Result<PathBuf> {
    validate_root(&expand_path(input, base)?)
}

/// Make `path` absolute and check that it is an existing directory.
///
/// This is the only hard failure of a scan: there is nothing to analyze
/// below a missing root.
pub fn validate_root(path: &Path) -> Result<PathBuf> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        expand_path(&path.to_string_lossy(), None)?
    };
    let metadata = match std::fs::metadata(&path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScanError::NotFound(path));
        }
        Err(source) => return Err(ScanError::Io { path, source }),
    };
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(path));
    }
    Ok(path)
}

fn home_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ScanError::HomeDirUnavailable)
}
