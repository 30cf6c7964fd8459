//! Output formatting for analysis results.
//!
//! Supports three output formats:
//! - Report: the markdown document from [`crate::markdown`]
//! - JSON: the serialized analysis for programmatic consumption
//! - Pretty: colored terminal summary for human readability

use colored::*;
use serde::Serialize;
use std::io::{self, Write};

use crate::analyzer::{CodebaseAnalysis, QuickAnalysis};
use crate::detect::{sorted_by_lines, DependencyType, HttpMethod, Importance, TechStack};
use crate::markdown::format_size;

/// Languages listed in the pretty summary.
const PRETTY_LANGUAGES: usize = 5;

// =============================================================================
// JSON Format
// =============================================================================

/// Write any analysis as pretty-printed JSON followed by a newline.
pub fn write_json<T: Serialize, W: Write>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a colored summary of a full analysis.
pub fn write_pretty<W: Write>(out: &mut W, analysis: &CodebaseAnalysis) -> io::Result<()> {
    write_header(out, &analysis.root_path)?;
    write_identity(out, &analysis.project_name, &analysis.project_type)?;
    write_stack(out, &analysis.tech_stack)?;
    writeln!(out)?;

    writeln!(out, "  {}", "Statistics:".bold())?;
    writeln!(out, "    {:<14}{}", "Files", analysis.total_files)?;
    writeln!(out, "    {:<14}{}", "Lines", analysis.total_lines)?;
    writeln!(out, "    {:<14}{}", "Size", format_size(analysis.total_size))?;
    for (language, stats) in sorted_by_lines(&analysis.languages)
        .into_iter()
        .take(PRETTY_LANGUAGES)
    {
        writeln!(
            out,
            "      {:<12}{}",
            language.dimmed(),
            format!("{} files, {} lines", stats.files, stats.lines).dimmed()
        )?;
    }
    writeln!(out)?;

    let critical: Vec<_> = analysis
        .key_files
        .iter()
        .filter(|k| k.importance == Importance::Critical)
        .collect();
    if !critical.is_empty() {
        writeln!(out, "  {} ({}):", "Critical files".bold(), critical.len())?;
        for key in critical {
            writeln!(
                out,
                "    {:<10}{}",
                key.file_type.as_str().dimmed(),
                key.path.blue()
            )?;
        }
        writeln!(out)?;
    }

    if !analysis.apis.is_empty() {
        writeln!(out, "  {} ({}):", "API endpoints".bold(), analysis.apis.len())?;
        for api in &analysis.apis {
            write!(out, "    ")?;
            write_method_tag(out, api.method)?;
            writeln!(
                out,
                " {}  {}",
                api.path,
                analysis.relative_path(&api.file).dimmed()
            )?;
        }
        writeln!(out)?;
    }

    let count = |dep_type: DependencyType| {
        analysis
            .dependencies
            .iter()
            .filter(|d| d.dep_type == dep_type)
            .count()
    };
    writeln!(
        out,
        "  {} {} production, {} development, {} peer",
        "Dependencies:".bold(),
        count(DependencyType::Production),
        count(DependencyType::Development),
        count(DependencyType::Peer)
    )?;
    writeln!(out)?;
    Ok(())
}

/// Write a colored summary of a quick analysis.
pub fn write_quick_pretty<W: Write>(out: &mut W, quick: &QuickAnalysis) -> io::Result<()> {
    write_header(out, &quick.root_path)?;
    write_identity(out, &quick.project_name, &quick.project_type)?;
    write_stack(out, &quick.tech_stack)?;
    writeln!(out)?;
    writeln!(
        out,
        "  {} {} {}",
        "Files:".bold(),
        quick.total_files,
        "(bounded count)".dimmed()
    )?;
    writeln!(out)?;
    Ok(())
}

fn write_header<W: Write>(out: &mut W, root: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {} v{}",
        "repolens".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out)?;
    writeln!(out, "  {}{}", "Analyzing: ".dimmed(), root)?;
    writeln!(out)
}

fn write_identity<W: Write>(out: &mut W, name: &str, project_type: &str) -> io::Result<()> {
    writeln!(out, "  {}  {}", name.bold(), project_type.green())
}

fn write_stack<W: Write>(out: &mut W, stack: &TechStack) -> io::Result<()> {
    writeln!(out, "    {:<14}{}", "Runtime", stack.runtime)?;
    writeln!(out, "    {:<14}{}", "Language", stack.language)?;
    let optional = [
        ("Framework", &stack.framework),
        ("UI", &stack.ui),
        ("Styling", &stack.styling),
        ("Packages", &stack.package_manager),
        ("Deployment", &stack.deployment),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            writeln!(out, "    {:<14}{}", label, value)?;
        }
    }
    if !stack.database.is_empty() {
        writeln!(out, "    {:<14}{}", "Database", stack.database.join(", "))?;
    }
    if !stack.testing.is_empty() {
        writeln!(out, "    {:<14}{}", "Testing", stack.testing.join(", "))?;
    }
    Ok(())
}

fn write_method_tag<W: Write>(out: &mut W, method: HttpMethod) -> io::Result<()> {
    let tag = format!("{:<7}", method.as_str());
    match method {
        HttpMethod::Get => write!(out, "{}", tag.green()),
        HttpMethod::Post => write!(out, "{}", tag.yellow()),
        HttpMethod::Put | HttpMethod::Patch => write!(out, "{}", tag.blue()),
        HttpMethod::Delete => write!(out, "{}", tag.red()),
    }
}
