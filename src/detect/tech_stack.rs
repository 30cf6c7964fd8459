//! Tech stack detection from root marker files.
//!
//! Ecosystems are applied in a fixed order, later ones overriding the
//! runtime, language and package manager set by earlier ones:
//!
//! ```text
//! package.json  ->  Python markers  ->  Cargo.toml  ->  go.mod
//! ```
//!
//! Deployment detection is independent of that order. Nothing here fails:
//! an empty directory yields `unknown` runtime and language.

use std::fs;
use std::path::Path;

use super::manifest::PackageManifest;
use super::types::TechStack;

/// Package names mapped to the value they imply.
type NameTable = &'static [(&'static [&'static str], &'static str)];

const FRAMEWORKS: NameTable = &[
    (&["next"], "nextjs"),
    (&["nuxt"], "nuxt"),
    (&["@remix-run/react", "@remix-run/node"], "remix"),
    (&["gatsby"], "gatsby"),
    (&["@sveltejs/kit"], "sveltekit"),
    (&["astro"], "astro"),
    (&["@angular/core"], "angular"),
    (&["@nestjs/core"], "nestjs"),
    (&["express"], "express"),
    (&["fastify"], "fastify"),
    (&["koa"], "koa"),
    (&["hono"], "hono"),
    (&["vue"], "vue"),
    (&["svelte"], "svelte"),
];

const UI_LIBRARIES: NameTable = &[
    (&["react"], "react"),
    (&["vue"], "vue"),
    (&["svelte"], "svelte"),
    (&["solid-js"], "solid"),
    (&["preact"], "preact"),
];

const STYLING: NameTable = &[
    (&["tailwindcss"], "tailwind"),
    (&["styled-components"], "styled-components"),
    (&["@emotion/react", "@emotion/styled"], "emotion"),
    (&["@chakra-ui/react"], "chakra-ui"),
    (&["@mui/material"], "material-ui"),
    (&["sass"], "sass"),
    (&["bootstrap"], "bootstrap"),
];

const DATABASES: NameTable = &[
    (&["prisma", "@prisma/client"], "prisma"),
    (&["drizzle-orm"], "drizzle"),
    (&["mongoose", "mongodb"], "mongodb"),
    (&["pg", "postgres"], "postgresql"),
    (&["mysql", "mysql2"], "mysql"),
    (&["better-sqlite3", "sqlite3"], "sqlite"),
    (&["redis", "ioredis"], "redis"),
    (&["@supabase/supabase-js"], "supabase"),
    (&["firebase", "firebase-admin"], "firebase"),
    (&["typeorm"], "typeorm"),
    (&["sequelize"], "sequelize"),
];

const TEST_FRAMEWORKS: NameTable = &[
    (&["jest"], "jest"),
    (&["vitest"], "vitest"),
    (&["mocha"], "mocha"),
    (&["@playwright/test"], "playwright"),
    (&["cypress"], "cypress"),
    (&["@testing-library/react"], "testing-library"),
];

/// Lockfiles in preference order.
const NODE_LOCKFILES: &[(&str, &str)] = &[
    ("pnpm-lock.yaml", "pnpm"),
    ("yarn.lock", "yarn"),
    ("bun.lockb", "bun"),
    ("bun.lock", "bun"),
];

const PYTHON_MARKERS: &[&str] = &["requirements.txt", "pyproject.toml", "setup.py", "Pipfile"];

/// Substrings searched for in Python, Rust and Go manifests.
type SubstringTable = &'static [(&'static str, &'static str)];

const PYTHON_FRAMEWORKS: SubstringTable = &[
    ("fastapi", "fastapi"),
    ("django", "django"),
    ("flask", "flask"),
    ("streamlit", "streamlit"),
];

const RUST_FRAMEWORKS: SubstringTable = &[
    ("axum", "axum"),
    ("actix-web", "actix"),
    ("rocket", "rocket"),
    ("warp", "warp"),
    ("tauri", "tauri"),
    ("leptos", "leptos"),
];

const GO_FRAMEWORKS: SubstringTable = &[
    ("github.com/gin-gonic/gin", "gin"),
    ("github.com/labstack/echo", "echo"),
    ("github.com/gofiber/fiber", "fiber"),
    ("github.com/go-chi/chi", "chi"),
];

/// Deployment markers; first existing wins.
const DEPLOYMENT_MARKERS: &[(&[&str], &str)] = &[
    (
        &["Dockerfile", "docker-compose.yml", "docker-compose.yaml", "compose.yaml"],
        "docker",
    ),
    (&["vercel.json"], "vercel"),
    (&["netlify.toml"], "netlify"),
];

/// Infer the tech stack of the project rooted at `root`.
pub fn detect_tech_stack(root: &Path) -> TechStack {
    let mut stack = TechStack::default();

    if let Some(manifest) = PackageManifest::load(root) {
        apply_node(&mut stack, root, &manifest);
    }
    apply_python(&mut stack, root);
    apply_rust(&mut stack, root);
    apply_go(&mut stack, root);
    stack.deployment = detect_deployment(root);

    tracing::debug!(
        runtime = %stack.runtime,
        language = %stack.language,
        framework = ?stack.framework,
        "tech stack detected"
    );
    stack
}

/// The deployment target implied by marker files, if any.
pub fn detect_deployment(root: &Path) -> Option<String> {
    DEPLOYMENT_MARKERS
        .iter()
        .find(|(files, _)| files.iter().any(|f| root.join(f).is_file()))
        .map(|(_, target)| target.to_string())
}

fn apply_node(stack: &mut TechStack, root: &Path, manifest: &PackageManifest) {
    stack.runtime = "node".to_string();
    stack.language = if manifest.has_dependency("typescript") || root.join("tsconfig.json").is_file()
    {
        "typescript".to_string()
    } else {
        "javascript".to_string()
    };

    stack.framework = first_dependency(manifest, FRAMEWORKS);
    stack.ui = first_dependency(manifest, UI_LIBRARIES);
    stack.styling = first_dependency(manifest, STYLING);
    stack.database = all_dependencies(manifest, DATABASES);
    stack.testing = all_dependencies(manifest, TEST_FRAMEWORKS);

    let manager = NODE_LOCKFILES
        .iter()
        .find(|(lockfile, _)| root.join(lockfile).is_file())
        .map(|(_, manager)| *manager)
        .unwrap_or("npm");
    stack.package_manager = Some(manager.to_string());
}

fn apply_python(stack: &mut TechStack, root: &Path) {
    if !PYTHON_MARKERS.iter().any(|m| root.join(m).is_file()) {
        return;
    }
    stack.runtime = "python".to_string();
    stack.language = "python".to_string();

    let pyproject = read_marker(root, "pyproject.toml");
    let manager = if root.join("poetry.lock").is_file() || pyproject.contains("[tool.poetry]") {
        "poetry"
    } else if root.join("uv.lock").is_file() {
        "uv"
    } else if root.join("Pipfile").is_file() {
        "pipenv"
    } else {
        "pip"
    };
    stack.package_manager = Some(manager.to_string());

    let requirements = read_marker(root, "requirements.txt");
    let haystack = format!("{}\n{}", requirements, pyproject).to_lowercase();
    if let Some(framework) = first_substring(&haystack, PYTHON_FRAMEWORKS) {
        stack.framework = Some(framework);
    }
}

fn apply_rust(stack: &mut TechStack, root: &Path) {
    if !root.join("Cargo.toml").is_file() {
        return;
    }
    stack.runtime = "rust".to_string();
    stack.language = "rust".to_string();
    stack.package_manager = Some("cargo".to_string());

    let content = read_marker(root, "Cargo.toml").to_lowercase();
    if let Some(framework) = first_substring(&content, RUST_FRAMEWORKS) {
        stack.framework = Some(framework);
    }
}

fn apply_go(stack: &mut TechStack, root: &Path) {
    if !root.join("go.mod").is_file() {
        return;
    }
    stack.runtime = "go".to_string();
    stack.language = "go".to_string();
    stack.package_manager = Some("go".to_string());

    let content = read_marker(root, "go.mod");
    if let Some(framework) = first_substring(&content, GO_FRAMEWORKS) {
        stack.framework = Some(framework);
    }
}

fn first_dependency(manifest: &PackageManifest, table: NameTable) -> Option<String> {
    table
        .iter()
        .find(|(names, _)| names.iter().any(|n| manifest.has_dependency(n)))
        .map(|(_, value)| value.to_string())
}

fn all_dependencies(manifest: &PackageManifest, table: NameTable) -> Vec<String> {
    table
        .iter()
        .filter(|(names, _)| names.iter().any(|n| manifest.has_dependency(n)))
        .map(|(_, value)| value.to_string())
        .collect()
}

fn first_substring(haystack: &str, table: SubstringTable) -> Option<String> {
    table
        .iter()
        .find(|(needle, _)| haystack.contains(needle))
        .map(|(_, value)| value.to_string())
}

/// Read a marker file, treating any failure as empty content.
fn read_marker(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join(name)).unwrap_or_default()
}
