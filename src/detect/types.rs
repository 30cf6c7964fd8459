//! Core types produced by the detectors.

use serde::{Deserialize, Serialize};

/// Inferred technology profile of a codebase.
///
/// Every field is best effort: an absent value means "not detected".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStack {
    pub runtime: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styling: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub database: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub testing: Vec<String>,
}

impl Default for TechStack {
    fn default() -> Self {
        Self {
            runtime: UNKNOWN.to_string(),
            language: UNKNOWN.to_string(),
            framework: None,
            package_manager: None,
            ui: None,
            styling: None,
            deployment: None,
            database: Vec::new(),
            testing: Vec::new(),
        }
    }
}

/// Placeholder for an undetected runtime or language.
pub const UNKNOWN: &str = "unknown";

/// Role of a declared dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Production,
    Development,
    Peer,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Production => "production",
            DependencyType::Development => "development",
            DependencyType::Peer => "peer",
        }
    }
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse purpose of a dependency, assigned from its package name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyCategory {
    Testing,
    Linting,
    Build,
    Ui,
    Styling,
    Database,
    Auth,
    Other,
}

impl DependencyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyCategory::Testing => "testing",
            DependencyCategory::Linting => "linting",
            DependencyCategory::Build => "build",
            DependencyCategory::Ui => "ui",
            DependencyCategory::Styling => "styling",
            DependencyCategory::Database => "database",
            DependencyCategory::Auth => "auth",
            DependencyCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for DependencyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A package declared in the project manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "type")]
    pub dep_type: DependencyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<DependencyCategory>,
}

/// HTTP methods recognized in route handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// All methods, in detection order.
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One method handled at one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    /// Route path with dynamic segments as `:name`
    pub path: String,
    pub method: HttpMethod,
    /// Absolute path of the handler file
    pub file: String,
}

/// Semantic role of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Config,
    Entry,
    Component,
    Api,
    Model,
    Test,
    Doc,
    Script,
    Style,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Config => "config",
            FileType::Entry => "entry",
            FileType::Component => "component",
            FileType::Api => "api",
            FileType::Model => "model",
            FileType::Test => "test",
            FileType::Doc => "doc",
            FileType::Script => "script",
            FileType::Style => "style",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Importance tier. Variants are ordered by rank, most important first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Critical,
    High,
    Medium,
    Low,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Critical => "critical",
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structurally significant file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFile {
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub importance: Importance,
    pub size: u64,
    pub lines: usize,
}

/// Per-language totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub files: usize,
    pub lines: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_rank_order() {
        assert!(Importance::Critical < Importance::High);
        assert!(Importance::High < Importance::Medium);
        assert!(Importance::Medium < Importance::Low);
    }

    #[test]
    fn test_tech_stack_serialization_omits_absent_fields() {
        let stack = TechStack {
            runtime: "node".to_string(),
            language: "javascript".to_string(),
            package_manager: Some("pnpm".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&stack).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "runtime": "node",
                "language": "javascript",
                "packageManager": "pnpm"
            })
        );
    }

    #[test]
    fn test_enum_wire_names() {
        let endpoint = ApiEndpoint {
            path: "/api/items".to_string(),
            method: HttpMethod::Delete,
            file: "/tmp/route.ts".to_string(),
        };
        let json = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(json["method"], "DELETE");

        let key = KeyFile {
            path: "README.md".to_string(),
            file_type: FileType::Doc,
            importance: Importance::Low,
            size: 10,
            lines: 0,
        };
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json["type"], "doc");
        assert_eq!(json["importance"], "low");
    }
}
