//! Language statistics by file extension.

use phf::phf_map;
use std::collections::BTreeMap;

use super::LanguageStats;
use crate::scan::FileRecord;

/// Recognized code extensions (lowercase, no dot) and their language.
static CODE_EXTENSIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "ts" => "TypeScript",
    "tsx" => "TypeScript",
    "mts" => "TypeScript",
    "cts" => "TypeScript",
    "js" => "JavaScript",
    "jsx" => "JavaScript",
    "mjs" => "JavaScript",
    "cjs" => "JavaScript",
    "vue" => "Vue",
    "svelte" => "Svelte",
    "astro" => "Astro",
    "py" => "Python",
    "rs" => "Rust",
    "go" => "Go",
    "java" => "Java",
    "kt" => "Kotlin",
    "scala" => "Scala",
    "swift" => "Swift",
    "rb" => "Ruby",
    "php" => "PHP",
    "cs" => "C#",
    "c" => "C",
    "h" => "C",
    "cpp" => "C++",
    "cc" => "C++",
    "hpp" => "C++",
    "dart" => "Dart",
    "ex" => "Elixir",
    "exs" => "Elixir",
    "css" => "CSS",
    "scss" => "SCSS",
    "sass" => "Sass",
    "less" => "Less",
    "html" => "HTML",
    "sql" => "SQL",
    "sh" => "Shell",
    "bash" => "Shell",
    "zsh" => "Shell",
    "prisma" => "Prisma",
    "graphql" => "GraphQL",
};

/// The language of a lowercase extension, if it is recognized code.
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    CODE_EXTENSIONS.get(extension).copied()
}

/// Sum file and line counts per language.
///
/// Files with unrecognized extensions are left out.
pub fn aggregate_languages(files: &[FileRecord]) -> BTreeMap<String, LanguageStats> {
    let mut languages: BTreeMap<String, LanguageStats> = BTreeMap::new();
    for file in files {
        if let Some(language) = language_for_extension(&file.extension) {
            let stats = languages.entry(language.to_string()).or_default();
            stats.files += 1;
            stats.lines += file.lines;
        }
    }
    languages
}

/// Languages ordered by line count, descending, then by name.
pub fn sorted_by_lines(
    languages: &BTreeMap<String, LanguageStats>,
) -> Vec<(&str, LanguageStats)> {
    let mut sorted: Vec<_> = languages.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    sorted.sort_by(|a, b| b.1.lines.cmp(&a.1.lines).then_with(|| a.0.cmp(b.0)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, lines: usize) -> FileRecord {
        let name = path.rsplit('/').next().unwrap().to_string();
        let extension = name.rsplit_once('.').map(|(_, e)| e.to_string()).unwrap_or_default();
        FileRecord {
            path: path.to_string(),
            name,
            size: 100,
            lines,
            extension,
        }
    }

    #[test]
    fn test_language_lookup() {
        assert_eq!(language_for_extension("tsx"), Some("TypeScript"));
        assert_eq!(language_for_extension("rs"), Some("Rust"));
        assert_eq!(language_for_extension("json"), None);
        assert_eq!(language_for_extension(""), None);
    }

    #[test]
    fn test_aggregate_buckets_by_language() {
        let files = vec![
            record("src/a.ts", 10),
            record("src/b.tsx", 5),
            record("main.py", 7),
            record("package.json", 0),
        ];
        let languages = aggregate_languages(&files);
        assert_eq!(languages.len(), 2);
        assert_eq!(languages["TypeScript"], LanguageStats { files: 2, lines: 15 });
        assert_eq!(languages["Python"], LanguageStats { files: 1, lines: 7 });
    }

    #[test]
    fn test_sorted_by_lines() {
        let files = vec![
            record("a.py", 3),
            record("b.rs", 30),
            record("c.go", 3),
        ];
        let languages = aggregate_languages(&files);
        let names: Vec<_> = sorted_by_lines(&languages).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Rust", "Go", "Python"]);
    }
}
