//! Node-style manifest (`package.json`) loading.
//!
//! A missing or malformed manifest is reported as `None`; callers treat
//! both as "no manifest".

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const PACKAGE_JSON: &str = "package.json";

/// The parts of `package.json` the detectors read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default)]
    pub dependencies: BTreeMap<String, Value>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, Value>,
    #[serde(default)]
    pub peer_dependencies: BTreeMap<String, Value>,
}

impl PackageManifest {
    /// Load `package.json` from `root`.
    pub fn load(root: &Path) -> Option<Self> {
        let path = root.join(PACKAGE_JSON);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "cannot read manifest");
                }
                return None;
            }
        };
        match Self::parse(&content) {
            Some(m) => Some(m),
            None => {
                tracing::debug!(path = %path.display(), "malformed manifest ignored");
                None
            }
        }
    }

    pub fn parse(content: &str) -> Option<Self> {
        serde_json::from_str(content).ok()
    }

    /// Returns true if any dependency map declares `name`.
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
            || self.dev_dependencies.contains_key(name)
            || self.peer_dependencies.contains_key(name)
    }
}

/// Render a manifest version value as text. Non-string values are dropped.
pub fn version_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}
