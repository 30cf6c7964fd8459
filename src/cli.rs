//! Command-line interface for repolens.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::analyzer::Analyzer;
use crate::config::ScanConfig;
use crate::markdown::{FileSummaries, MarkdownRenderer};
use crate::report;
use crate::resolve::resolve_root;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Output formats accepted by `analyze`.
const FORMATS: &[&str] = &["report", "json", "pretty"];

/// Codebase analysis and reporting.
///
/// Repolens walks a project directory, infers its tech stack, dependencies,
/// API surface and key files, and renders the result as a markdown report,
/// a compact context document, JSON, or a terminal summary.
#[derive(Parser)]
#[command(name = "repolens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a codebase and render a report
    Analyze(AnalyzeArgs),
    /// Render a compact context document for a codebase
    Context(ContextArgs),
}

/// Options shared by every command that scans a directory.
#[derive(Parser)]
pub struct ScanArgs {
    /// Directory to analyze
    pub path: String,

    /// Maximum directory depth to descend
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Path to config YAML file (default: auto-discover in PATH)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory that relative paths are resolved against
    #[arg(long)]
    pub base_path: Option<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Output format: report, json, or pretty
    #[arg(short, long, default_value = "report")]
    pub format: String,

    /// Detect the tech stack and count files only
    #[arg(short, long)]
    pub quick: bool,

    /// JSON object mapping relative file paths to summaries
    #[arg(long)]
    pub summaries: Option<PathBuf>,

    /// Abort the scan after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the context command.
#[derive(Parser)]
pub struct ContextArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Describe a planned change to get a modification context
    #[arg(short, long)]
    pub goal: Option<String>,
}

/// Resolve the root and load its configuration.
fn prepare(args: &ScanArgs) -> anyhow::Result<(PathBuf, ScanConfig)> {
    let root = resolve_root(&args.path, args.base_path.as_deref())?;
    let mut config = ScanConfig::load(&root, args.config.as_deref())?;
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    Ok((root, config))
}

/// Load a summaries side-table.
fn load_summaries(path: &Path) -> anyhow::Result<FileSummaries> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read summaries file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid summaries file {}", path.display()))
}

/// Send rendered text to `--output` or stdout.
fn emit(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create directory {}", parent.display())
                    })?;
                }
            }
            fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    if !FORMATS.contains(&args.format.as_str()) {
        eprintln!(
            "Error: invalid format {:?}, must be one of {}",
            args.format,
            FORMATS.join(", ")
        );
        return Ok(EXIT_ERROR);
    }
    if args.quick && args.format == "report" {
        eprintln!("Error: --quick cannot produce a report; use --format json or pretty");
        return Ok(EXIT_ERROR);
    }

    let (root, config) = prepare(&args.scan)?;
    let mut analyzer = Analyzer::with_config(&root, &config)?;
    if let Some(secs) = args.timeout {
        analyzer = analyzer.deadline(Instant::now() + Duration::from_secs(secs));
    }

    // Colors only make sense on a terminal.
    if args.scan.output.is_some() {
        colored::control::set_override(false);
    }

    let mut buf = Vec::new();
    if args.quick {
        let quick = analyzer.quick()?;
        match args.format.as_str() {
            "json" => report::write_json(&mut buf, &quick)?,
            _ => report::write_quick_pretty(&mut buf, &quick)?,
        }
        emit(args.scan.output.as_deref(), &String::from_utf8_lossy(&buf))?;
        return Ok(EXIT_SUCCESS);
    }

    let summaries = match &args.summaries {
        Some(path) => Some(load_summaries(path)?),
        None => None,
    };

    let analysis = analyzer.analyze()?;
    let text = match args.format.as_str() {
        "json" => {
            report::write_json(&mut buf, &analysis)?;
            String::from_utf8_lossy(&buf).into_owned()
        }
        "pretty" => {
            report::write_pretty(&mut buf, &analysis)?;
            String::from_utf8_lossy(&buf).into_owned()
        }
        _ => MarkdownRenderer::new(config.report.clone()).report(&analysis, summaries.as_ref()),
    };
    emit(args.scan.output.as_deref(), &text)?;
    Ok(EXIT_SUCCESS)
}

/// Run the context command.
pub fn run_context(args: &ContextArgs) -> anyhow::Result<i32> {
    let (root, config) = prepare(&args.scan)?;
    let analysis = Analyzer::with_config(&root, &config)?.analyze()?;

    let renderer = MarkdownRenderer::new(config.report.clone());
    let text = match args.goal.as_deref().map(str::trim) {
        Some(goal) if !goal.is_empty() => renderer.modification_context(&analysis, goal),
        _ => renderer.context(&analysis),
    };
    emit(args.scan.output.as_deref(), &text)?;
    Ok(EXIT_SUCCESS)
}
