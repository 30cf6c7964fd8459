//! Directory walking.
//!
//! A walk produces both the hierarchical [`DirectoryNode`] tree and a flat
//! list of [`FileRecord`]s from a single traversal, so no file is read
//! twice.

mod skip;
mod walker;

use globset::GlobSet;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::DEFAULT_MAX_DEPTH;
use crate::detect::Importance;
use crate::error::{Result, ScanError};

pub use skip::{should_skip, skip_names};
pub use walker::{quick_count, walk};

/// One regular file seen by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Relative to the scan root, `/`-separated
    pub path: String,
    pub name: String,
    pub size: u64,
    /// Zero unless the extension is a recognized code extension
    pub lines: usize,
    /// Lowercased, without the leading dot; empty when absent
    pub extension: String,
}

/// Kind of tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    File,
    Directory,
}

/// A node of the scanned tree. Each node owns its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    pub name: String,
    /// Relative path; the root is "."
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    /// Directories first, then files, each case-insensitively by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DirectoryNode>>,
}

impl DirectoryNode {
    pub fn directory(name: String, path: String, children: Vec<DirectoryNode>) -> Self {
        Self {
            name,
            path,
            node_type: NodeType::Directory,
            size: None,
            extension: None,
            importance: None,
            children: Some(children),
        }
    }

    pub fn file(record: &FileRecord, importance: Importance) -> Self {
        Self {
            name: record.name.clone(),
            path: record.path.clone(),
            node_type: NodeType::File,
            size: Some(record.size),
            extension: (!record.extension.is_empty()).then(|| record.extension.clone()),
            importance: Some(importance),
            children: None,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.node_type == NodeType::Directory
    }

    pub fn children(&self) -> &[DirectoryNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Number of file nodes in this subtree.
    pub fn file_count(&self) -> usize {
        self.iter().filter(|n| !n.is_dir()).count()
    }

    /// Look up a node by its relative path.
    pub fn find(&self, rel_path: &str) -> Option<&DirectoryNode> {
        if rel_path == "." || rel_path.is_empty() {
            return Some(self);
        }
        let mut node = self;
        for segment in rel_path.split('/') {
            node = node.children().iter().find(|c| c.name == segment)?;
        }
        Some(node)
    }

    /// Depth-first, pre-order traversal including `self`.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }
}

/// Pre-order iterator over a tree.
pub struct NodeIter<'a> {
    stack: Vec<&'a DirectoryNode>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a DirectoryNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// Output of a walk.
#[derive(Debug, Clone)]
pub struct WalkOutput {
    pub tree: DirectoryNode,
    /// Files in tree pre-order
    pub files: Vec<FileRecord>,
}

/// Limits and interruption signals for a walk.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub max_depth: usize,
    pub cancel: Option<Arc<AtomicBool>>,
    pub deadline: Option<Instant>,
    pub exclude: GlobSet,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            cancel: None,
            deadline: None,
            exclude: GlobSet::empty(),
        }
    }
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn exclude(mut self, set: GlobSet) -> Self {
        self.exclude = set;
        self
    }

    /// Fail if the caller cancelled the scan or its deadline passed.
    pub fn check_interrupted(&self) -> Result<()> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(ScanError::Cancelled);
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(ScanError::DeadlineExceeded);
            }
        }
        Ok(())
    }

    pub fn is_excluded(&self, rel_path: &str) -> bool {
        !self.exclude.is_empty() && self.exclude.is_match(rel_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap().to_string(),
            size: 1,
            lines: 0,
            extension: String::new(),
        }
    }

    fn sample_tree() -> DirectoryNode {
        let inner = DirectoryNode::directory(
            "src".to_string(),
            "src".to_string(),
            vec![DirectoryNode::file(&record("src/main.rs"), Importance::Critical)],
        );
        DirectoryNode::directory(
            "app".to_string(),
            ".".to_string(),
            vec![
                inner,
                DirectoryNode::file(&record("Makefile"), Importance::Low),
            ],
        )
    }

    #[test]
    fn test_find_and_count() {
        let tree = sample_tree();
        assert_eq!(tree.file_count(), 2);
        assert_eq!(tree.find(".").unwrap().name, "app");
        assert_eq!(tree.find("src/main.rs").unwrap().path, "src/main.rs");
        assert!(tree.find("src/lib.rs").is_none());
    }

    #[test]
    fn test_iter_is_preorder() {
        let tree = sample_tree();
        let paths: Vec<_> = tree.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec![".", "src", "src/main.rs", "Makefile"]);
    }

    #[test]
    fn test_file_node_omits_empty_extension() {
        let node = DirectoryNode::file(&record("Makefile"), Importance::Low);
        assert!(node.extension.is_none());
        assert!(node.children.is_none());
    }

    #[test]
    fn test_cancel_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let options = ScanOptions::new().cancel_flag(flag.clone());
        assert!(options.check_interrupted().is_ok());
        flag.store(true, Ordering::Relaxed);
        assert!(matches!(
            options.check_interrupted(),
            Err(ScanError::Cancelled)
        ));
    }

    #[test]
    fn test_past_deadline() {
        let options = ScanOptions::new().deadline(Instant::now());
        assert!(matches!(
            options.check_interrupted(),
            Err(ScanError::DeadlineExceeded)
        ));
    }
}
