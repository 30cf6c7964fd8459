//! Fixed skip rules applied before recursion.

use phf::phf_set;

/// Directory names never descended into: build artifacts, VCS metadata,
/// caches, dependency installs and compiled output across ecosystems.
static SKIP_DIRS: phf::Set<&'static str> = phf_set! {
    // JavaScript/Node.js
    "node_modules",
    ".pnpm-store",
    ".next",
    ".nuxt",
    ".svelte-kit",
    ".turbo",
    ".vercel",
    ".parcel-cache",
    ".cache",
    "dist",
    "build",
    "out",
    "coverage",
    // VCS
    ".git",
    ".hg",
    ".svn",
    // Python
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    "venv",
    ".venv",
    "env",
    // Rust / JVM / .NET
    "target",
    ".gradle",
    "obj",
    // PHP / Go
    "vendor",
    // Editors
    ".idea",
    ".vscode",
};

/// File names never recorded: OS and editor artifacts, lockfiles.
static SKIP_FILES: phf::Set<&'static str> = phf_set! {
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "bun.lock",
    "Cargo.lock",
    "poetry.lock",
    "uv.lock",
    "Pipfile.lock",
    "composer.lock",
    "Gemfile.lock",
    "go.sum",
};

/// Hidden names that are kept despite the leading dot.
static ALLOWED_HIDDEN: phf::Set<&'static str> = phf_set! {
    ".env",
    ".env.example",
    ".env.local",
    ".env.development",
    ".env.production",
    ".gitignore",
    ".dockerignore",
    ".eslintrc",
    ".eslintrc.js",
    ".eslintrc.cjs",
    ".eslintrc.json",
    ".prettierrc",
    ".prettierrc.js",
    ".prettierrc.json",
    ".babelrc",
    ".editorconfig",
    ".nvmrc",
    ".npmrc",
    ".github",
};

/// Returns true if an entry with this name must not appear in a scan.
pub fn should_skip(name: &str, is_dir: bool) -> bool {
    if is_dir && SKIP_DIRS.contains(name) {
        return true;
    }
    if !is_dir && SKIP_FILES.contains(name) {
        return true;
    }
    name.starts_with('.') && !ALLOWED_HIDDEN.contains(name)
}

/// Every name in the fixed skip-sets, directories first.
pub fn skip_names() -> impl Iterator<Item = &'static str> {
    SKIP_DIRS.iter().chain(SKIP_FILES.iter()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_dirs() {
        assert!(should_skip("node_modules", true));
        assert!(should_skip(".git", true));
        assert!(should_skip("target", true));
        assert!(!should_skip("src", true));
    }

    #[test]
    fn test_skip_files() {
        assert!(should_skip("pnpm-lock.yaml", false));
        assert!(should_skip(".DS_Store", false));
        assert!(!should_skip("package.json", false));
    }

    #[test]
    fn test_every_lockfile_is_skipped() {
        for name in [
            "package-lock.json",
            "yarn.lock",
            "pnpm-lock.yaml",
            "bun.lockb",
            "bun.lock",
            "poetry.lock",
            "uv.lock",
            "Pipfile.lock",
            "Cargo.lock",
            "go.sum",
        ] {
            assert!(should_skip(name, false), "{} should be skipped", name);
        }
    }

    #[test]
    fn test_dir_names_only_apply_to_dirs() {
        assert!(!should_skip("build", false));
        assert!(!should_skip("yarn.lock", true));
    }

    #[test]
    fn test_hidden_allow_list() {
        assert!(!should_skip(".env", false));
        assert!(!should_skip(".eslintrc.json", false));
        assert!(!should_skip(".github", true));
        assert!(should_skip(".secret", false));
        assert!(should_skip(".husky", true));
    }
}
