//! Key file classification.
//!
//! Importance and file type are pure functions of `(relative path, file
//! name)`, each expressed as an ordered rule table where the first
//! matching rule wins.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{FileType, Importance, KeyFile};
use crate::scan::FileRecord;

/// Well-known configuration file names.
pub const CONFIG_FILES: &[&str] = &[
    "package.json",
    "tsconfig.json",
    "jsconfig.json",
    "next.config.js",
    "next.config.mjs",
    "next.config.ts",
    "nuxt.config.ts",
    "svelte.config.js",
    "astro.config.mjs",
    "vite.config.js",
    "vite.config.ts",
    "vitest.config.ts",
    "jest.config.js",
    "jest.config.ts",
    "webpack.config.js",
    "babel.config.js",
    "tailwind.config.js",
    "tailwind.config.ts",
    "postcss.config.js",
    "postcss.config.mjs",
    "drizzle.config.ts",
    "eslint.config.js",
    "eslint.config.mjs",
    ".eslintrc",
    ".eslintrc.js",
    ".eslintrc.json",
    ".prettierrc",
    "prettier.config.js",
    ".env.example",
    "Dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    "vercel.json",
    "netlify.toml",
    "Cargo.toml",
    "go.mod",
    "pyproject.toml",
    "requirements.txt",
    "setup.py",
    "Makefile",
];

/// Canonical entry-point and manifest names.
const ENTRY_FILES: &[&str] = &[
    "package.json",
    "Cargo.toml",
    "go.mod",
    "pyproject.toml",
    "index.ts",
    "index.tsx",
    "index.js",
    "index.jsx",
    "main.ts",
    "main.tsx",
    "main.js",
    "main.jsx",
    "main.py",
    "main.rs",
    "main.go",
    "lib.rs",
    "app.py",
    "manage.py",
];

/// What a rule looks at.
enum Pattern {
    /// Exact file name
    FileName(&'static [&'static str]),
    /// Regex over the file name
    Name(Regex),
    /// Regex over the relative path
    Path(Regex),
}

impl Pattern {
    fn name(re: &str) -> Self {
        Pattern::Name(Regex::new(re).unwrap())
    }

    fn path(re: &str) -> Self {
        Pattern::Path(Regex::new(re).unwrap())
    }

    fn matches(&self, rel_path: &str, name: &str) -> bool {
        match self {
            Pattern::FileName(names) => names.contains(&name),
            Pattern::Name(re) => re.is_match(name),
            Pattern::Path(re) => re.is_match(rel_path),
        }
    }
}

struct Rule<T> {
    pattern: Pattern,
    result: T,
}

fn rule<T>(pattern: Pattern, result: T) -> Rule<T> {
    Rule { pattern, result }
}

fn first_match<T: Copy>(rules: &[Rule<T>], rel_path: &str, name: &str, default: T) -> T {
    rules
        .iter()
        .find(|r| r.pattern.matches(rel_path, name))
        .map(|r| r.result)
        .unwrap_or(default)
}

static IMPORTANCE_RULES: Lazy<Vec<Rule<Importance>>> = Lazy::new(|| {
    vec![
        rule(Pattern::FileName(ENTRY_FILES), Importance::Critical),
        rule(
            Pattern::path(r"^(src/)?app/(layout|page)\.[jt]sx?$"),
            Importance::Critical,
        ),
        rule(
            Pattern::path(r"^(src/)?pages/(_app|_document|index)\.[jt]sx?$"),
            Importance::Critical,
        ),
        rule(Pattern::path(r"^src/App\.[jt]sx?$"), Importance::Critical),
        rule(Pattern::FileName(CONFIG_FILES), Importance::High),
        rule(
            Pattern::path(r"(?i)(^|/)(api|routes|models|lib)/"),
            Importance::High,
        ),
        rule(
            Pattern::path(r"(?i)(^|/)(components|hooks|utils|services)/"),
            Importance::Medium,
        ),
    ]
});

// Test file names are checked before the directory rules so that
// `components/button.test.ts` is a test, not a component.
static TYPE_RULES: Lazy<Vec<Rule<FileType>>> = Lazy::new(|| {
    vec![
        rule(Pattern::FileName(CONFIG_FILES), FileType::Config),
        rule(Pattern::name(r"\.config\.[A-Za-z]+$"), FileType::Config),
        rule(Pattern::name(r"\.(test|spec)\."), FileType::Test),
        rule(Pattern::path(r"(?i)(^|/)(api|routes)/"), FileType::Api),
        rule(Pattern::path(r"(?i)(^|/)(components|ui)/"), FileType::Component),
        rule(
            Pattern::path(r"(?i)(^|/)(models|entities|schema)(/|\.)"),
            FileType::Model,
        ),
        rule(
            Pattern::path(r"(?i)(^|/)(tests?|__tests__)/"),
            FileType::Test,
        ),
        rule(Pattern::name(r"(?i)(\.mdx?$|^readme)"), FileType::Doc),
        rule(Pattern::name(r"(?i)\.(css|scss|sass|less|styl)$"), FileType::Style),
        rule(Pattern::path(r"(?i)(^|/)scripts/"), FileType::Script),
        rule(Pattern::name(r"(?i)\.(sh|bash|zsh|ps1)$"), FileType::Script),
    ]
});

/// Returns true if `name` is a well-known configuration file.
pub fn is_config_file(name: &str) -> bool {
    CONFIG_FILES.contains(&name)
}

/// Importance tier of a file.
pub fn classify_importance(rel_path: &str, name: &str) -> Importance {
    first_match(&IMPORTANCE_RULES, rel_path, name, Importance::Low)
}

/// Semantic type of a file.
pub fn classify_type(rel_path: &str, name: &str) -> FileType {
    first_match(&TYPE_RULES, rel_path, name, FileType::Entry)
}

/// Select key files from the flat file list, most important first.
///
/// A file is kept when it is critical or high, or a known config file.
/// Order within a tier follows the input.
pub fn collect_key_files(files: &[FileRecord]) -> Vec<KeyFile> {
    let mut key_files: Vec<KeyFile> = files
        .iter()
        .filter_map(|f| {
            let importance = classify_importance(&f.path, &f.name);
            let promoted = matches!(importance, Importance::Critical | Importance::High)
                || is_config_file(&f.name);
            promoted.then(|| KeyFile {
                path: f.path.clone(),
                file_type: classify_type(&f.path, &f.name),
                importance,
                size: f.size,
                lines: f.lines,
            })
        })
        .collect();

    // sort_by_key is stable
    key_files.sort_by_key(|k| k.importance);
    key_files
}
