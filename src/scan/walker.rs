//! Recursive directory walker.
//!
//! Sibling subdirectories and file reads run on the rayon pool. Child order
//! never depends on completion order: every directory's children are sorted
//! once, after collection, by (directories first, lowercased name, name).

use rayon::prelude::*;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{should_skip, DirectoryNode, FileRecord, ScanOptions, WalkOutput};
use crate::detect::{classify_importance, language_for_extension};
use crate::error::Result;

/// A directory entry that survived the skip rules.
struct Entry {
    name: String,
    rel_path: String,
    path: PathBuf,
}

/// Walk `root` and return its tree and flat file list.
///
/// Directories at `options.max_depth` appear in the tree with no children.
/// Unreadable entries are logged and left out; only cancellation or an
/// expired deadline aborts the walk.
pub fn walk(root: &Path, options: &ScanOptions) -> Result<WalkOutput> {
    let (children, files) = walk_dir(root, ".", 0, options)?;
    let tree = DirectoryNode::directory(root_name(root), ".".to_string(), children);
    Ok(WalkOutput { tree, files })
}

/// Count files under `root` down to `max_depth` levels, without reading them.
///
/// Uses the same skip rules and exclusions as [`walk`].
pub fn quick_count(root: &Path, max_depth: usize, options: &ScanOptions) -> Result<usize> {
    let mut count = 0;
    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if should_skip(&name, e.file_type().is_dir()) {
                return false;
            }
            match e.path().strip_prefix(root) {
                Ok(rel) => !options.is_excluded(&to_slash(rel)),
                Err(_) => true,
            }
        });

    for entry in walker {
        options.check_interrupted()?;
        match entry {
            Ok(e) if e.file_type().is_file() => count += 1,
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "skipping unreadable entry"),
        }
    }
    Ok(count)
}

fn walk_dir(
    dir: &Path,
    rel: &str,
    depth: usize,
    options: &ScanOptions,
) -> Result<(Vec<DirectoryNode>, Vec<FileRecord>)> {
    options.check_interrupted()?;

    if depth >= options.max_depth {
        tracing::trace!(dir = rel, depth, "depth bound reached");
        return Ok((Vec::new(), Vec::new()));
    }

    let read = match fs::read_dir(dir) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot list directory");
            return Ok((Vec::new(), Vec::new()));
        }
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in read {
        options.check_interrupted()?;
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot read entry");
                continue;
            }
        };
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "cannot stat entry");
                continue;
            }
        };
        // Symlinks and special files are not followed.
        if !file_type.is_dir() && !file_type.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if should_skip(&name, file_type.is_dir()) {
            continue;
        }
        let rel_path = join_rel(rel, &name);
        if options.is_excluded(&rel_path) {
            continue;
        }

        let e = Entry {
            name,
            rel_path,
            path: entry.path(),
        };
        if file_type.is_dir() {
            dirs.push(e);
        } else {
            files.push(e);
        }
    }

    let mut subdirs = dirs
        .par_iter()
        .map(|d| {
            let (children, records) = walk_dir(&d.path, &d.rel_path, depth + 1, options)?;
            let node = DirectoryNode::directory(d.name.clone(), d.rel_path.clone(), children);
            Ok((node, records))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut leaves: Vec<(DirectoryNode, FileRecord)> = files
        .par_iter()
        .filter_map(read_file)
        .collect();

    subdirs.sort_by(|a, b| compare_names(&a.0.name, &b.0.name));
    leaves.sort_by(|a, b| compare_names(&a.0.name, &b.0.name));

    let mut children = Vec::with_capacity(subdirs.len() + leaves.len());
    let mut records = Vec::new();
    for (node, sub_records) in subdirs {
        children.push(node);
        records.extend(sub_records);
    }
    for (node, record) in leaves {
        children.push(node);
        records.push(record);
    }

    Ok((children, records))
}

/// Stat a file and count its lines if it is source code.
fn read_file(entry: &Entry) -> Option<(DirectoryNode, FileRecord)> {
    let metadata = match fs::metadata(&entry.path) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(path = %entry.path.display(), error = %e, "cannot stat file");
            return None;
        }
    };

    let extension = Path::new(&entry.name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let lines = if language_for_extension(&extension).is_some() {
        match fs::read(&entry.path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).lines().count(),
            Err(e) => {
                tracing::warn!(path = %entry.path.display(), error = %e, "cannot read file");
                return None;
            }
        }
    } else {
        0
    };

    let record = FileRecord {
        path: entry.rel_path.clone(),
        name: entry.name.clone(),
        size: metadata.len(),
        lines,
        extension,
    };
    let node = DirectoryNode::file(&record, classify_importance(&record.path, &record.name));
    Some((node, record))
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn join_rel(parent: &str, name: &str) -> String {
    if parent == "." {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn child_names(node: &DirectoryNode) -> Vec<&str> {
        node.children().iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_directories_first_case_insensitive() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.ts", "x");
        write(temp.path(), "A.ts", "x");
        write(temp.path(), "zeta/x.ts", "x");
        write(temp.path(), "Alpha/x.ts", "x");
        write(temp.path(), "c.md", "x");

        let out = walk(temp.path(), &ScanOptions::new()).unwrap();
        assert_eq!(
            child_names(&out.tree),
            vec!["Alpha", "zeta", "A.ts", "b.ts", "c.md"]
        );
        let paths: Vec<_> = out.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["Alpha/x.ts", "zeta/x.ts", "A.ts", "b.ts", "c.md"]);
    }

    #[test]
    fn test_line_counts_only_for_code() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "main.py", "a = 1\nb = 2\nprint(a + b)\n");
        write(temp.path(), "notes.txt", "one\ntwo\n");

        let out = walk(temp.path(), &ScanOptions::new()).unwrap();
        let py = out.files.iter().find(|f| f.name == "main.py").unwrap();
        let txt = out.files.iter().find(|f| f.name == "notes.txt").unwrap();
        assert_eq!(py.lines, 3);
        assert_eq!(py.extension, "py");
        assert_eq!(txt.lines, 0);
        assert_eq!(txt.size, 8);
    }

    #[test]
    fn test_skip_rules_applied() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "node_modules/react/index.js", "x");
        write(temp.path(), ".git/HEAD", "ref");
        write(temp.path(), "yarn.lock", "x");
        write(temp.path(), ".env", "KEY=1");
        write(temp.path(), ".secret", "x");
        write(temp.path(), "index.js", "x");

        let out = walk(temp.path(), &ScanOptions::new()).unwrap();
        assert_eq!(child_names(&out.tree), vec![".env", "index.js"]);
        assert_eq!(out.files.len(), 2);
    }

    #[test]
    fn test_lockfiles_not_recorded() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "bun.lock", "{}");
        write(temp.path(), "uv.lock", "version = 1");
        write(temp.path(), "main.py", "x = 1\n");

        let out = walk(temp.path(), &ScanOptions::new()).unwrap();
        assert_eq!(child_names(&out.tree), vec!["main.py"]);
        assert_eq!(out.files.len(), 1);
    }

    #[test]
    fn test_vanished_file_is_dropped() {
        let temp = TempDir::new().unwrap();
        let entry = Entry {
            name: "gone.ts".to_string(),
            rel_path: "src/gone.ts".to_string(),
            path: temp.path().join("src/gone.ts"),
        };
        assert!(read_file(&entry).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_unlistable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        write(temp.path(), "locked/secret.ts", "x\n");
        write(temp.path(), "open/visible.ts", "x\n");
        write(temp.path(), "top.ts", "x\n");

        let locked = temp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users can list it anyway.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = walk(temp.path(), &ScanOptions::new());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let out = result.unwrap();

        let locked_node = out.tree.find("locked").unwrap();
        assert!(locked_node.children().is_empty());
        assert!(out.tree.find("open/visible.ts").is_some());
        let paths: Vec<_> = out.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["open/visible.ts", "top.ts"]);
        assert_eq!(out.tree.file_count(), out.files.len());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_code_file_is_dropped() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        write(temp.path(), "private.rs", "fn main() {}\n");
        write(temp.path(), "public.rs", "fn main() {}\n");

        let private = temp.path().join("private.rs");
        fs::set_permissions(&private, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read(&private).is_ok() {
            return;
        }

        let out = walk(temp.path(), &ScanOptions::new()).unwrap();
        assert_eq!(child_names(&out.tree), vec!["public.rs"]);
        assert_eq!(out.files.len(), 1);
        assert_eq!(out.files[0].lines, 1);
    }

    #[test]
    fn test_depth_bound_truncates() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a/b/c/deep.rs", "fn main() {}\n");
        write(temp.path(), "a/shallow.rs", "fn main() {}\n");

        let out = walk(temp.path(), &ScanOptions::new().max_depth(2)).unwrap();
        let b = out.tree.find("a/b").unwrap();
        assert!(b.is_dir());
        assert!(b.children().is_empty());
        assert!(out.tree.find("a/shallow.rs").is_some());
        assert_eq!(out.files.len(), 1);
    }

    #[test]
    fn test_exclude_globs() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/fixtures/big.json", "{}");
        write(temp.path(), "src/lib.rs", "");

        let set = globset::GlobSetBuilder::new()
            .add(globset::Glob::new("**/fixtures").unwrap())
            .build()
            .unwrap();
        let out = walk(temp.path(), &ScanOptions::new().exclude(set)).unwrap();
        assert!(out.tree.find("src/fixtures").is_none());
        assert_eq!(out.files.len(), 1);
    }

    #[test]
    fn test_cancelled_walk() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.rs", "");
        let options = ScanOptions::new().cancel_flag(Arc::new(AtomicBool::new(true)));
        assert!(walk(temp.path(), &options).is_err());
    }

    #[test]
    fn test_quick_count() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.rs", "");
        write(temp.path(), "src/b.rs", "");
        write(temp.path(), "src/deep/er/c.rs", "");
        write(temp.path(), "node_modules/x/index.js", "");

        let options = ScanOptions::new();
        assert_eq!(quick_count(temp.path(), 10, &options).unwrap(), 3);
        assert_eq!(quick_count(temp.path(), 2, &options).unwrap(), 2);
    }
}
