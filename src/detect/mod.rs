//! Detectors that derive structural facts from a scanned codebase.

mod api;
mod dependencies;
mod key_files;
mod languages;
mod manifest;
mod tech_stack;
mod types;

pub use api::{detect_api_endpoints, detect_methods, find_api_dir, route_path};
pub use dependencies::{categorize, dependencies_from_manifest, extract_dependencies};
pub use key_files::{
    classify_importance, classify_type, collect_key_files, is_config_file, CONFIG_FILES,
};
pub use languages::{aggregate_languages, language_for_extension, sorted_by_lines};
pub use manifest::PackageManifest;
pub use tech_stack::{detect_deployment, detect_tech_stack};
pub use types::{
    ApiEndpoint, Dependency, DependencyCategory, DependencyType, FileType, HttpMethod, Importance,
    KeyFile, LanguageStats, TechStack, UNKNOWN,
};
