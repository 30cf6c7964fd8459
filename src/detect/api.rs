//! HTTP API surface detection for file-system routed projects.
//!
//! Handler files are taken from the walker's flat file list, so every
//! endpoint points at a file that is also in the scanned tree.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;

use super::types::{ApiEndpoint, HttpMethod};
use crate::scan::FileRecord;

/// Route directories in lookup order; the first existing one is used.
const API_DIRS: &[&str] = &["src/app/api", "app/api", "pages/api", "src/pages/api"];

/// Conventional route handler file names.
const HANDLER_FILES: &[&str] = &["route.ts", "route.js"];

lazy_static! {
    /// `export [async] function GET` or `export const GET =`, per method.
    static ref METHOD_PATTERNS: Vec<(HttpMethod, Regex)> = HttpMethod::ALL
        .iter()
        .map(|m| {
            let re = Regex::new(&format!(
                r"export\s+(?:async\s+)?function\s+{0}\b|export\s+const\s+{0}\s*=",
                m.as_str()
            ))
            .unwrap();
            (*m, re)
        })
        .collect();
}

/// The API route directory under `root`, if any, relative and `/`-separated.
pub fn find_api_dir(root: &Path) -> Option<&'static str> {
    API_DIRS.iter().copied().find(|d| root.join(d).is_dir())
}

/// Detect endpoints declared by route handler files under the API directory.
pub fn detect_api_endpoints(root: &Path, files: &[FileRecord]) -> Vec<ApiEndpoint> {
    let Some(api_dir) = find_api_dir(root) else {
        return Vec::new();
    };
    let prefix = format!("{}/", api_dir);

    let mut endpoints = Vec::new();
    for file in files {
        if !HANDLER_FILES.contains(&file.name.as_str()) {
            continue;
        }
        let Some(rest) = file.path.strip_prefix(&prefix) else {
            continue;
        };
        let route_dir = rest.strip_suffix(file.name.as_str()).unwrap_or("");
        let route = route_path(route_dir);

        let abs_path = root.join(&file.path);
        let content = match fs::read_to_string(&abs_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %abs_path.display(), error = %e, "cannot read route handler");
                continue;
            }
        };

        let file_str = abs_path.to_string_lossy().to_string();
        for method in detect_methods(&content) {
            endpoints.push(ApiEndpoint {
                path: route.clone(),
                method,
                file: file_str.clone(),
            });
        }
    }

    tracing::debug!(api_dir, endpoints = endpoints.len(), "api surface detected");
    endpoints
}

/// HTTP methods exported by a handler source, in [`HttpMethod::ALL`] order.
pub fn detect_methods(source: &str) -> Vec<HttpMethod> {
    METHOD_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(source))
        .map(|(m, _)| *m)
        .collect()
}

/// Build a route path from the directories between the API root and a
/// handler file.
///
/// `[id]` becomes `:id`, `[...slug]` and `[[...slug]]` become `:slug*`,
/// and route groups such as `(admin)` are dropped.
pub fn route_path(route_dir: &str) -> String {
    let mut path = String::from("/api");
    for segment in route_dir.split('/').filter(|s| !s.is_empty()) {
        if segment.starts_with('(') && segment.ends_with(')') {
            continue;
        }
        path.push('/');
        path.push_str(&translate_segment(segment));
    }
    path
}

fn translate_segment(segment: &str) -> String {
    if let Some(name) = segment
        .strip_prefix("[[...")
        .and_then(|s| s.strip_suffix("]]"))
    {
        return format!(":{}*", name);
    }
    if let Some(name) = segment
        .strip_prefix("[...")
        .and_then(|s| s.strip_suffix(']'))
    {
        return format!(":{}*", name);
    }
    if let Some(name) = segment.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return format!(":{}", name);
    }
    segment.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(path: &str) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap().to_string(),
            size: 0,
            lines: 0,
            extension: "ts".to_string(),
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_route_path_segments() {
        assert_eq!(route_path(""), "/api");
        assert_eq!(route_path("widgets/"), "/api/widgets");
        assert_eq!(route_path("widgets/[id]/"), "/api/widgets/:id");
        assert_eq!(route_path("(admin)/users/"), "/api/users");
        assert_eq!(route_path("docs/[...slug]/"), "/api/docs/:slug*");
        assert_eq!(route_path("shop/[[...path]]/"), "/api/shop/:path*");
    }

    #[test]
    fn test_detect_methods() {
        let source = r#"
import { NextResponse } from "next/server";

export async function GET(req: Request) {
  return NextResponse.json([]);
}

export function POST(req: Request) {}

export const PATCH = handler;

function DELETE() {}
"#;
        assert_eq!(
            detect_methods(source),
            vec![HttpMethod::Get, HttpMethod::Post, HttpMethod::Patch]
        );
    }

    #[test]
    fn test_method_name_must_be_whole_word() {
        assert!(detect_methods("export async function GETTER() {}").is_empty());
    }

    #[test]
    fn test_dynamic_route_yields_endpoint_per_method() {
        let temp = TempDir::new().unwrap();
        let rel = "src/app/api/widgets/[id]/route.ts";
        write(
            temp.path(),
            rel,
            "export async function GET() {}\nexport async function DELETE() {}\n",
        );

        let endpoints = detect_api_endpoints(temp.path(), &[record(rel)]);
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].path, "/api/widgets/:id");
        assert_eq!(endpoints[0].method, HttpMethod::Get);
        assert_eq!(endpoints[1].path, "/api/widgets/:id");
        assert_eq!(endpoints[1].method, HttpMethod::Delete);
        assert_eq!(endpoints[0].file, endpoints[1].file);
        assert!(endpoints[0].file.ends_with("route.ts"));
    }

    #[test]
    fn test_legacy_pages_api() {
        let temp = TempDir::new().unwrap();
        let rel = "pages/api/health/route.js";
        write(temp.path(), rel, "export function GET() {}\n");

        let endpoints = detect_api_endpoints(temp.path(), &[record(rel)]);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "/api/health");
    }

    #[test]
    fn test_first_convention_wins() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/app/api/a/route.ts", "export function GET() {}\n");
        write(temp.path(), "pages/api/b/route.ts", "export function GET() {}\n");

        let files = vec![
            record("src/app/api/a/route.ts"),
            record("pages/api/b/route.ts"),
        ];
        let endpoints = detect_api_endpoints(temp.path(), &files);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "/api/a");
    }

    #[test]
    fn test_no_api_dir() {
        let temp = TempDir::new().unwrap();
        assert!(find_api_dir(temp.path()).is_none());
        assert!(detect_api_endpoints(temp.path(), &[]).is_empty());
    }

    #[test]
    fn test_non_handler_files_ignored() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/app/api/util.ts", "export function GET() {}\n");
        let endpoints = detect_api_endpoints(temp.path(), &[record("src/app/api/util.ts")]);
        assert!(endpoints.is_empty());
    }
}
