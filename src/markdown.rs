//! Markdown rendering of a [`CodebaseAnalysis`].
//!
//! Three forms are produced from the same analysis:
//! - Full report: every section, for people reading the codebase
//! - Context: a compact summary sized for embedding in a prompt or document
//! - Modification context: the context plus a goal and candidate files
//!
//! Rendering never touches the filesystem. The section headings of the full
//! report are matched by its table of contents and by downstream tooling;
//! keep them in sync with [`SECTIONS`].

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Write};

use crate::analyzer::CodebaseAnalysis;
use crate::config::ReportConfig;
use crate::detect::{sorted_by_lines, DependencyCategory, DependencyType, Importance};
use crate::scan::DirectoryNode;

/// Full report sections, in order: (heading, anchor).
pub const SECTIONS: &[(&str, &str)] = &[
    ("Tech Stack", "tech-stack"),
    ("Statistics", "statistics"),
    ("Key Files", "key-files"),
    ("Entry Points", "entry-points"),
    ("API Endpoints", "api-endpoints"),
    ("Dependencies", "dependencies"),
    ("Project Structure", "project-structure"),
];

/// Steps listed at the end of every modification context.
const GENERAL_APPROACH: &[&str] = &[
    "Review the files listed above to understand the current implementation.",
    "Identify the smallest set of changes that achieves the goal.",
    "Implement the changes following the existing patterns and conventions.",
    "Test the changes and verify that existing functionality still works.",
];

/// Summaries of individual files, keyed by relative path.
pub type FileSummaries = HashMap<String, String>;

/// Renders analyses with the given limits.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    config: ReportConfig,
}

impl MarkdownRenderer {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Render the full report.
    pub fn report(&self, analysis: &CodebaseAnalysis, summaries: Option<&FileSummaries>) -> String {
        render(|out| self.write_report(out, analysis, summaries))
    }

    /// Render the compact context.
    pub fn context(&self, analysis: &CodebaseAnalysis) -> String {
        render(|out| self.write_context(out, analysis))
    }

    /// Render the context for a planned modification.
    pub fn modification_context(&self, analysis: &CodebaseAnalysis, goal: &str) -> String {
        render(|out| self.write_modification_context(out, analysis, goal))
    }

    fn write_report(
        &self,
        out: &mut String,
        analysis: &CodebaseAnalysis,
        summaries: Option<&FileSummaries>,
    ) -> fmt::Result {
        writeln!(out, "# {}", analysis.project_name)?;
        writeln!(out)?;
        writeln!(
            out,
            "> Codebase analysis of a {} project: {} files, {} lines of code.",
            analysis.project_type, analysis.total_files, analysis.total_lines
        )?;
        writeln!(out)?;

        writeln!(out, "## Table of Contents")?;
        writeln!(out)?;
        for (heading, anchor) in SECTIONS {
            writeln!(out, "- [{}](#{})", heading, anchor)?;
        }
        writeln!(out)?;

        write_tech_stack(out, analysis)?;
        write_statistics(out, analysis)?;
        write_key_files(out, analysis, summaries)?;
        write_entry_points(out, analysis)?;
        write_api_endpoints(out, analysis)?;
        write_dependencies(out, analysis)?;
        self.write_structure(out, analysis)?;

        writeln!(out, "---")?;
        writeln!(out)?;
        writeln!(
            out,
            "*Generated by repolens v{} on {}*",
            env!("CARGO_PKG_VERSION"),
            analysis.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }

    fn write_context(&self, out: &mut String, analysis: &CodebaseAnalysis) -> fmt::Result {
        writeln!(out, "# {} - Codebase Context", analysis.project_name)?;
        writeln!(out)?;
        write_overview(out, analysis)?;

        writeln!(out, "## Critical Files")?;
        writeln!(out)?;
        let critical: Vec<_> = analysis
            .key_files
            .iter()
            .filter(|k| k.importance == Importance::Critical)
            .take(self.config.max_context_files)
            .collect();
        if critical.is_empty() {
            writeln!(out, "_None detected._")?;
        }
        for key in critical {
            writeln!(out, "- `{}` ({})", key.path, key.file_type)?;
        }
        writeln!(out)?;

        writeln!(out, "## Entry Points")?;
        writeln!(out)?;
        write_path_list(out, &analysis.entry_points, "_None detected._")
    }

    fn write_modification_context(
        &self,
        out: &mut String,
        analysis: &CodebaseAnalysis,
        goal: &str,
    ) -> fmt::Result {
        writeln!(out, "# Modification Context: {}", analysis.project_name)?;
        writeln!(out)?;
        writeln!(out, "## Goal")?;
        writeln!(out)?;
        writeln!(out, "{}", goal.trim())?;
        writeln!(out)?;

        writeln!(out, "## Project Overview")?;
        writeln!(out)?;
        write_overview(out, analysis)?;

        writeln!(out, "## Files Likely to Change")?;
        writeln!(out)?;
        let candidates: Vec<_> = analysis
            .key_files
            .iter()
            .filter(|k| matches!(k.importance, Importance::Critical | Importance::High))
            .take(self.config.max_modification_files)
            .collect();
        if candidates.is_empty() {
            writeln!(out, "_No key files detected._")?;
        }
        for key in candidates {
            writeln!(
                out,
                "- `{}` ({}, {})",
                key.path, key.importance, key.file_type
            )?;
        }
        writeln!(out)?;

        writeln!(out, "## Current API Endpoints")?;
        writeln!(out)?;
        if analysis.apis.is_empty() {
            writeln!(out, "_No API endpoints detected._")?;
        }
        for api in &analysis.apis {
            writeln!(
                out,
                "- `{} {}` in `{}`",
                api.method,
                api.path,
                analysis.relative_path(&api.file)
            )?;
        }
        writeln!(out)?;

        writeln!(out, "## General Approach")?;
        writeln!(out)?;
        for (i, step) in GENERAL_APPROACH.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, step)?;
        }
        Ok(())
    }

    fn write_structure(&self, out: &mut String, analysis: &CodebaseAnalysis) -> fmt::Result {
        writeln!(out, "## Project Structure")?;
        writeln!(out)?;
        writeln!(out, "```")?;
        writeln!(out, "{}/", analysis.structure.name)?;
        self.write_tree(out, &analysis.structure, "", 1)?;
        writeln!(out, "```")?;
        writeln!(out)
    }

    fn write_tree(
        &self,
        out: &mut String,
        node: &DirectoryNode,
        prefix: &str,
        level: usize,
    ) -> fmt::Result {
        let children = node.children();
        let dirs: Vec<_> = children.iter().filter(|c| c.is_dir()).collect();
        let files: Vec<_> = children.iter().filter(|c| !c.is_dir()).collect();
        let shown = files.len().min(self.config.max_files_per_dir);
        let hidden = files.len() - shown;

        let mut rows: Vec<Option<&DirectoryNode>> = dirs.into_iter().map(Some).collect();
        rows.extend(files.into_iter().take(shown).map(Some));
        if hidden > 0 {
            rows.push(None);
        }

        let count = rows.len();
        for (i, row) in rows.into_iter().enumerate() {
            let last = i + 1 == count;
            let connector = if last { "└── " } else { "├── " };
            match row {
                Some(child) if child.is_dir() => {
                    writeln!(out, "{}{}{}/", prefix, connector, child.name)?;
                    if level < self.config.tree_depth {
                        let extension = if last { "    " } else { "│   " };
                        self.write_tree(out, child, &format!("{}{}", prefix, extension), level + 1)?;
                    }
                }
                Some(child) => {
                    writeln!(out, "{}{}{}", prefix, connector, child.name)?;
                }
                None => {
                    let plural = if hidden == 1 { "" } else { "s" };
                    writeln!(out, "{}{}... +{} more file{}", prefix, connector, hidden, plural)?;
                }
            }
        }
        Ok(())
    }
}

/// Run a section writer against a fresh buffer.
fn render(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    // Formatting into a String only fails if a Display impl does.
    if write(&mut out).is_err() {
        tracing::warn!("markdown rendering stopped early");
    }
    out
}

/// Render the full report with default limits.
pub fn render_report(analysis: &CodebaseAnalysis, summaries: Option<&FileSummaries>) -> String {
    MarkdownRenderer::default().report(analysis, summaries)
}

/// Render the compact context with default limits.
pub fn render_context(analysis: &CodebaseAnalysis) -> String {
    MarkdownRenderer::default().context(analysis)
}

/// Render the modification context with default limits.
pub fn render_modification_context(analysis: &CodebaseAnalysis, goal: &str) -> String {
    MarkdownRenderer::default().modification_context(analysis, goal)
}

/// Human-readable byte size.
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit + 1 < UNITS.len() {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

fn category_label(category: DependencyCategory) -> &'static str {
    match category {
        DependencyCategory::Testing => "Testing",
        DependencyCategory::Linting => "Linting",
        DependencyCategory::Build => "Build",
        DependencyCategory::Ui => "UI",
        DependencyCategory::Styling => "Styling",
        DependencyCategory::Database => "Database",
        DependencyCategory::Auth => "Auth",
        DependencyCategory::Other => "Other",
    }
}

fn write_overview(out: &mut String, analysis: &CodebaseAnalysis) -> fmt::Result {
    let stack = &analysis.tech_stack;
    writeln!(
        out,
        "{} is a {} project written in {} ({} runtime) with {} files and {} lines of code.",
        analysis.project_name,
        analysis.project_type,
        stack.language,
        stack.runtime,
        analysis.total_files,
        analysis.total_lines
    )?;
    writeln!(out)?;
    writeln!(out, "- **Project type:** {}", analysis.project_type)?;
    writeln!(out, "- **Language:** {}", stack.language)?;
    if let Some(framework) = &stack.framework {
        writeln!(out, "- **Framework:** {}", framework)?;
    }
    if let Some(manager) = &stack.package_manager {
        writeln!(out, "- **Package manager:** {}", manager)?;
    }
    writeln!(out, "- **Files:** {}", analysis.total_files)?;
    writeln!(out, "- **Lines of code:** {}", analysis.total_lines)?;
    writeln!(out, "- **Dependencies:** {}", analysis.dependencies.len())?;
    writeln!(out, "- **API endpoints:** {}", analysis.apis.len())?;
    writeln!(out)
}

fn write_path_list(out: &mut String, paths: &[String], empty: &str) -> fmt::Result {
    if paths.is_empty() {
        writeln!(out, "{}", empty)?;
    }
    for path in paths {
        writeln!(out, "- `{}`", path)?;
    }
    writeln!(out)
}

fn write_tech_stack(out: &mut String, analysis: &CodebaseAnalysis) -> fmt::Result {
    let stack = &analysis.tech_stack;
    writeln!(out, "## Tech Stack")?;
    writeln!(out)?;
    writeln!(out, "| Category | Technology |")?;
    writeln!(out, "|----------|------------|")?;

    let optional = [
        ("Framework", &stack.framework),
        ("UI", &stack.ui),
        ("Styling", &stack.styling),
        ("Package Manager", &stack.package_manager),
        ("Deployment", &stack.deployment),
    ];
    writeln!(out, "| Runtime | {} |", stack.runtime)?;
    writeln!(out, "| Language | {} |", stack.language)?;
    for (label, value) in optional {
        if let Some(value) = value {
            writeln!(out, "| {} | {} |", label, value)?;
        }
    }
    if !stack.database.is_empty() {
        writeln!(out, "| Database | {} |", stack.database.join(", "))?;
    }
    if !stack.testing.is_empty() {
        writeln!(out, "| Testing | {} |", stack.testing.join(", "))?;
    }
    writeln!(out)
}

fn write_statistics(out: &mut String, analysis: &CodebaseAnalysis) -> fmt::Result {
    writeln!(out, "## Statistics")?;
    writeln!(out)?;
    writeln!(out, "| Metric | Value |")?;
    writeln!(out, "|--------|-------|")?;
    writeln!(out, "| Total Files | {} |", analysis.total_files)?;
    writeln!(out, "| Total Lines | {} |", analysis.total_lines)?;
    writeln!(out, "| Total Size | {} |", format_size(analysis.total_size))?;
    writeln!(out, "| Key Files | {} |", analysis.key_files.len())?;
    writeln!(out, "| Dependencies | {} |", analysis.dependencies.len())?;
    writeln!(out, "| API Endpoints | {} |", analysis.apis.len())?;
    writeln!(out)?;

    if analysis.languages.is_empty() {
        return Ok(());
    }
    writeln!(out, "### Languages")?;
    writeln!(out)?;
    writeln!(out, "| Language | Files | Lines |")?;
    writeln!(out, "|----------|-------|-------|")?;
    for (language, stats) in sorted_by_lines(&analysis.languages) {
        writeln!(out, "| {} | {} | {} |", language, stats.files, stats.lines)?;
    }
    writeln!(out)
}

fn write_key_files(
    out: &mut String,
    analysis: &CodebaseAnalysis,
    summaries: Option<&FileSummaries>,
) -> fmt::Result {
    writeln!(out, "## Key Files")?;
    writeln!(out)?;

    let tier = |importance: Importance| {
        analysis
            .key_files
            .iter()
            .filter(move |k| k.importance == importance)
    };

    writeln!(out, "### Critical Files")?;
    writeln!(out)?;
    let mut any_critical = false;
    for key in tier(Importance::Critical) {
        any_critical = true;
        writeln!(out, "#### `{}`", key.path)?;
        writeln!(out)?;
        writeln!(out, "- **Type:** {}", key.file_type)?;
        writeln!(out, "- **Lines:** {}", key.lines)?;
        writeln!(out, "- **Size:** {}", format_size(key.size))?;
        if let Some(summary) = summaries.and_then(|s| s.get(&key.path)) {
            writeln!(out)?;
            writeln!(out, "> {}", summary.trim())?;
        }
        writeln!(out)?;
    }
    if !any_critical {
        writeln!(out, "_No critical files detected._")?;
        writeln!(out)?;
    }

    let high: Vec<_> = tier(Importance::High).collect();
    if !high.is_empty() {
        writeln!(out, "### High Importance Files")?;
        writeln!(out)?;
        writeln!(out, "| File | Type | Lines |")?;
        writeln!(out, "|------|------|-------|")?;
        for key in high {
            writeln!(out, "| `{}` | {} | {} |", key.path, key.file_type, key.lines)?;
        }
        writeln!(out)?;
    }

    let other: Vec<_> = analysis
        .key_files
        .iter()
        .filter(|k| matches!(k.importance, Importance::Medium | Importance::Low))
        .map(|k| format!("`{}`", k.path))
        .collect();
    if !other.is_empty() {
        writeln!(out, "### Other Configuration Files")?;
        writeln!(out)?;
        writeln!(out, "{}", other.join(", "))?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_entry_points(out: &mut String, analysis: &CodebaseAnalysis) -> fmt::Result {
    writeln!(out, "## Entry Points")?;
    writeln!(out)?;
    write_path_list(out, &analysis.entry_points, "_No entry points detected._")
}

fn write_api_endpoints(out: &mut String, analysis: &CodebaseAnalysis) -> fmt::Result {
    writeln!(out, "## API Endpoints")?;
    writeln!(out)?;
    if analysis.apis.is_empty() {
        writeln!(out, "_No API endpoints detected._")?;
        writeln!(out)?;
        return Ok(());
    }
    writeln!(out, "| Method | Path | File |")?;
    writeln!(out, "|--------|------|------|")?;
    for api in &analysis.apis {
        writeln!(
            out,
            "| {} | `{}` | `{}` |",
            api.method,
            api.path,
            analysis.relative_path(&api.file)
        )?;
    }
    writeln!(out)
}

fn write_dependencies(out: &mut String, analysis: &CodebaseAnalysis) -> fmt::Result {
    writeln!(out, "## Dependencies")?;
    writeln!(out)?;
    if analysis.dependencies.is_empty() {
        writeln!(out, "_No dependencies detected._")?;
        writeln!(out)?;
        return Ok(());
    }

    let mut production: BTreeMap<DependencyCategory, Vec<_>> = BTreeMap::new();
    for dep in analysis
        .dependencies
        .iter()
        .filter(|d| d.dep_type == DependencyType::Production)
    {
        production
            .entry(dep.category.unwrap_or(DependencyCategory::Other))
            .or_default()
            .push(dep);
    }
    if !production.is_empty() {
        writeln!(out, "### Production")?;
        writeln!(out)?;
        for (category, deps) in production {
            writeln!(out, "#### {}", category_label(category))?;
            writeln!(out)?;
            for dep in deps {
                match &dep.version {
                    Some(version) => writeln!(out, "- `{}` ({})", dep.name, version)?,
                    None => writeln!(out, "- `{}`", dep.name)?,
                }
            }
            writeln!(out)?;
        }
    }

    for (dep_type, heading) in [
        (DependencyType::Development, "Development"),
        (DependencyType::Peer, "Peer"),
    ] {
        let names: Vec<_> = analysis
            .dependencies
            .iter()
            .filter(|d| d.dep_type == dep_type)
            .map(|d| format!("`{}`", d.name))
            .collect();
        if names.is_empty() {
            continue;
        }
        writeln!(out, "### {}", heading)?;
        writeln!(out)?;
        writeln!(out, "{}", names.join(", "))?;
        writeln!(out)?;
    }
    Ok(())
}
