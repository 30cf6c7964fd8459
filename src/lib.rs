//! Repolens - codebase analysis and reporting.
//!
//! Repolens walks a project directory once and derives a structural
//! picture of it: the directory tree, tech stack, declared dependencies,
//! HTTP API surface, key files and per-language statistics. The result is
//! a serializable [`CodebaseAnalysis`] that can be rendered as markdown.
//!
//! # Architecture
//!
//! - `resolve`: user path expansion and root validation
//! - `scan`: the parallel directory walker and its skip rules
//! - `detect`: detectors that consume the walker's output
//! - `analyzer`: runs the detectors concurrently and merges their results
//! - `markdown`: report, context and modification context renderers
//! - `report`: JSON and terminal output
//! - `config`: optional YAML configuration
//!
//! # Example
//!
//! ```no_run
//! let analysis = repolens::analyze("./my-app")?;
//! println!("{}", repolens::render_report(&analysis, None));
//! # Ok::<(), repolens::ScanError>(())
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod markdown;
pub mod report;
pub mod resolve;
pub mod scan;

pub use analyzer::{analyze, quick_analyze, Analyzer, CodebaseAnalysis, QuickAnalysis};
pub use config::{ReportConfig, ScanConfig};
pub use detect::{
    ApiEndpoint, Dependency, DependencyCategory, DependencyType, FileType, HttpMethod, Importance,
    KeyFile, LanguageStats, TechStack,
};
pub use error::{Result, ScanError};
pub use markdown::{
    render_context, render_modification_context, render_report, FileSummaries, MarkdownRenderer,
};
pub use resolve::{expand_path, resolve_root};
pub use scan::{DirectoryNode, FileRecord, NodeType, ScanOptions};
