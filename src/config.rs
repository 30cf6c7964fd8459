//! Scan configuration.
//!
//! Configuration is optional. When present it is read from a YAML file in
//! the scanned root (or an explicit path) and only tunes limits and extra
//! exclusions; detection heuristics are fixed.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScanError};

/// Config file names looked up in the scanned root.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["repolens.yaml", ".repolens.yaml"];

/// Default walker depth bound.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Default depth bound for the quick file count.
pub const DEFAULT_QUICK_MAX_DEPTH: usize = 5;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub max_depth: usize,
    pub quick_max_depth: usize,
    /// Glob patterns matched against relative, slash-separated paths
    /// (e.g. "**/fixtures/**", "docs/generated/*")
    pub exclude: Vec<String>,
    pub report: ReportConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            quick_max_depth: DEFAULT_QUICK_MAX_DEPTH,
            exclude: Vec::new(),
            report: ReportConfig::default(),
        }
    }
}

/// Limits applied by the markdown renderers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory levels shown in the project structure tree
    pub tree_depth: usize,
    /// Files listed per directory before the "+N more" line
    pub max_files_per_dir: usize,
    /// Critical files listed in the compact context
    pub max_context_files: usize,
    /// Candidate files listed in the modification context
    pub max_modification_files: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            tree_depth: 3,
            max_files_per_dir: 10,
            max_context_files: 10,
            max_modification_files: 15,
        }
    }
}

impl ScanConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ScanError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find a config file in `root`.
    pub fn discover(root: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|p| p.is_file())
    }

    /// Load the explicit config if given, else a discovered one, else defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        match explicit.map(Path::to_path_buf).or_else(|| Self::discover(root)) {
            Some(path) => {
                tracing::debug!(config = %path.display(), "loading config");
                Self::parse_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Compile the `exclude` patterns into one matcher.
    pub fn exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern).map_err(|source| ScanError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| ScanError::InvalidGlob {
            pattern: self.exclude.join(", "),
            source,
        })
    }
}
