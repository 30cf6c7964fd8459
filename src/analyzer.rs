//! Analysis assembly.
//!
//! The walker runs first; tech stack, dependencies, API surface, language
//! statistics and key files are then computed concurrently and merged by
//! [`CodebaseAnalysis::assemble`], which performs no I/O.

use chrono::{DateTime, Utc};
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{ScanConfig, DEFAULT_QUICK_MAX_DEPTH};
use crate::detect::{
    aggregate_languages, collect_key_files, detect_api_endpoints, detect_tech_stack,
    extract_dependencies, ApiEndpoint, Dependency, FileType, Importance, KeyFile, LanguageStats,
    TechStack,
};
use crate::error::Result;
use crate::resolve::validate_root;
use crate::scan::{quick_count, walk, DirectoryNode, FileRecord, ScanOptions, WalkOutput};

static FRAMEWORK_LABELS: phf::Map<&'static str, &'static str> = phf_map! {
    "nextjs" => "Next.js",
    "nuxt" => "Nuxt",
    "remix" => "Remix",
    "gatsby" => "Gatsby",
    "sveltekit" => "SvelteKit",
    "astro" => "Astro",
    "angular" => "Angular",
    "nestjs" => "NestJS",
    "express" => "Express",
    "fastify" => "Fastify",
    "koa" => "Koa",
    "hono" => "Hono",
    "vue" => "Vue",
    "svelte" => "Svelte",
    "fastapi" => "FastAPI",
    "django" => "Django",
    "flask" => "Flask",
    "streamlit" => "Streamlit",
    "axum" => "Axum",
    "actix" => "Actix Web",
    "rocket" => "Rocket",
    "warp" => "Warp",
    "tauri" => "Tauri",
    "leptos" => "Leptos",
    "gin" => "Gin",
    "echo" => "Echo",
    "fiber" => "Fiber",
    "chi" => "Chi",
};

static RUNTIME_LABELS: phf::Map<&'static str, &'static str> = phf_map! {
    "node" => "Node.js",
    "python" => "Python",
    "rust" => "Rust",
    "go" => "Go",
    "unknown" => "Unknown",
};

/// Display label for a project: the framework when known, else the runtime.
pub fn project_type_label(stack: &TechStack) -> String {
    if let Some(framework) = &stack.framework {
        return FRAMEWORK_LABELS
            .get(framework.as_str())
            .map(|l| l.to_string())
            .unwrap_or_else(|| framework.clone());
    }
    RUNTIME_LABELS
        .get(stack.runtime.as_str())
        .map(|l| l.to_string())
        .unwrap_or_else(|| stack.runtime.clone())
}

/// Complete result of a full analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodebaseAnalysis {
    pub project_name: String,
    pub root_path: String,
    pub project_type: String,
    pub tech_stack: TechStack,
    pub structure: DirectoryNode,
    pub key_files: Vec<KeyFile>,
    pub dependencies: Vec<Dependency>,
    pub entry_points: Vec<String>,
    pub apis: Vec<ApiEndpoint>,
    pub total_files: usize,
    pub total_lines: usize,
    pub total_size: u64,
    pub languages: BTreeMap<String, LanguageStats>,
    pub analyzed_at: DateTime<Utc>,
}

/// Result of a quick analysis: tech stack plus a bounded file count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAnalysis {
    pub project_name: String,
    pub root_path: String,
    pub project_type: String,
    pub tech_stack: TechStack,
    pub total_files: usize,
    pub analyzed_at: DateTime<Utc>,
}

/// Independently computed outputs merged into one analysis.
#[derive(Debug, Clone)]
pub struct Components {
    pub root: PathBuf,
    pub walk: WalkOutput,
    pub tech_stack: TechStack,
    pub dependencies: Vec<Dependency>,
    pub apis: Vec<ApiEndpoint>,
    pub languages: BTreeMap<String, LanguageStats>,
    pub key_files: Vec<KeyFile>,
    pub analyzed_at: DateTime<Utc>,
}

impl CodebaseAnalysis {
    /// Merge component outputs and derive totals, entry points and the
    /// project type label.
    pub fn assemble(parts: Components) -> Self {
        let files = &parts.walk.files;
        let total_files = files.len();
        let total_lines = files.iter().map(|f| f.lines).sum();
        let total_size = files.iter().map(|f| f.size).sum();

        let entry_points = parts
            .key_files
            .iter()
            .filter(|k| k.file_type == FileType::Entry && k.importance == Importance::Critical)
            .map(|k| k.path.clone())
            .collect();

        Self {
            project_name: parts.walk.tree.name.clone(),
            root_path: parts.root.to_string_lossy().to_string(),
            project_type: project_type_label(&parts.tech_stack),
            tech_stack: parts.tech_stack,
            structure: parts.walk.tree,
            key_files: parts.key_files,
            dependencies: parts.dependencies,
            entry_points,
            apis: parts.apis,
            total_files,
            total_lines,
            total_size,
            languages: parts.languages,
            analyzed_at: parts.analyzed_at,
        }
    }

    /// Path of an API handler relative to the scan root.
    pub fn relative_path<'a>(&self, file: &'a str) -> &'a str {
        file.strip_prefix(self.root_path.as_str())
            .map(|p| p.trim_start_matches(|c| c == '/' || c == '\\'))
            .unwrap_or(file)
    }
}

/// Runs analyses of one root directory.
pub struct Analyzer {
    root: PathBuf,
    options: ScanOptions,
    quick_max_depth: usize,
}

impl Analyzer {
    /// Create an analyzer with default limits.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options: ScanOptions::default(),
            quick_max_depth: DEFAULT_QUICK_MAX_DEPTH,
        }
    }

    /// Create an analyzer with limits and exclusions from `config`.
    pub fn with_config<P: AsRef<Path>>(root: P, config: &ScanConfig) -> Result<Self> {
        let options = ScanOptions::new()
            .max_depth(config.max_depth)
            .exclude(config.exclude_set()?);
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            options,
            quick_max_depth: config.quick_max_depth,
        })
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = depth;
        self
    }

    pub fn quick_max_depth(mut self, depth: usize) -> Self {
        self.quick_max_depth = depth;
        self
    }

    /// Abort the scan with `Cancelled` once `flag` is set.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.options.cancel = Some(flag);
        self
    }

    /// Abort the scan with `DeadlineExceeded` after `deadline`.
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.options.deadline = Some(deadline);
        self
    }

    /// Run a full analysis.
    pub fn analyze(&self) -> Result<CodebaseAnalysis> {
        let started = Instant::now();
        let root = validate_root(&self.root)?;
        tracing::info!(root = %root.display(), max_depth = self.options.max_depth, "starting analysis");

        let walk_output = walk(&root, &self.options)?;
        let files: &[FileRecord] = &walk_output.files;

        let ((tech_stack, dependencies), (apis, (languages, key_files))) = rayon::join(
            || rayon::join(|| detect_tech_stack(&root), || extract_dependencies(&root)),
            || {
                rayon::join(
                    || detect_api_endpoints(&root, files),
                    || rayon::join(|| aggregate_languages(files), || collect_key_files(files)),
                )
            },
        );

        let analysis = CodebaseAnalysis::assemble(Components {
            root,
            walk: walk_output,
            tech_stack,
            dependencies,
            apis,
            languages,
            key_files,
            analyzed_at: Utc::now(),
        });

        tracing::info!(
            files = analysis.total_files,
            lines = analysis.total_lines,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis complete"
        );
        Ok(analysis)
    }

    /// Run a quick analysis: tech stack and a bounded file count only.
    pub fn quick(&self) -> Result<QuickAnalysis> {
        let root = validate_root(&self.root)?;
        tracing::info!(root = %root.display(), "starting quick analysis");

        let (tech_stack, total_files) = rayon::join(
            || detect_tech_stack(&root),
            || quick_count(&root, self.quick_max_depth, &self.options),
        );

        Ok(QuickAnalysis {
            project_name: root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| root.to_string_lossy().into_owned()),
            root_path: root.to_string_lossy().to_string(),
            project_type: project_type_label(&tech_stack),
            tech_stack,
            total_files: total_files?,
            analyzed_at: Utc::now(),
        })
    }
}

/// Run a full analysis of `root` with default limits.
pub fn analyze<P: AsRef<Path>>(root: P) -> Result<CodebaseAnalysis> {
    Analyzer::new(root).analyze()
}

/// Run a quick analysis of `root` with default limits.
pub fn quick_analyze<P: AsRef<Path>>(root: P) -> Result<QuickAnalysis> {
    Analyzer::new(root).quick()
}
