//! Dependency extraction from `package.json`.

use std::path::Path;

use super::manifest::{version_string, PackageManifest};
use super::types::{Dependency, DependencyCategory, DependencyType};

/// Name substrings per category, checked in order; first match wins.
const CATEGORY_RULES: &[(DependencyCategory, &[&str])] = &[
    (
        DependencyCategory::Testing,
        &[
            "jest",
            "vitest",
            "mocha",
            "chai",
            "cypress",
            "playwright",
            "testing-library",
            "supertest",
        ],
    ),
    (
        DependencyCategory::Linting,
        &["eslint", "prettier", "stylelint", "biome", "lint"],
    ),
    (
        DependencyCategory::Build,
        &[
            "webpack",
            "vite",
            "rollup",
            "esbuild",
            "babel",
            "typescript",
            "tsup",
            "turbo",
            "swc",
            "parcel",
        ],
    ),
    (
        DependencyCategory::Ui,
        &[
            "react",
            "vue",
            "svelte",
            "@radix-ui",
            "@headlessui",
            "@mui",
            "@chakra-ui",
            "lucide",
            "framer-motion",
        ],
    ),
    (
        DependencyCategory::Styling,
        &[
            "tailwind",
            "styled-components",
            "@emotion",
            "sass",
            "postcss",
            "autoprefixer",
            "css",
        ],
    ),
    (
        DependencyCategory::Database,
        &[
            "prisma",
            "drizzle",
            "mongoose",
            "mongodb",
            "postgres",
            "pg",
            "mysql",
            "sqlite",
            "redis",
            "sequelize",
            "typeorm",
            "supabase",
            "knex",
        ],
    ),
    (
        DependencyCategory::Auth,
        &["auth", "passport", "jsonwebtoken", "jwt", "bcrypt", "clerk", "lucia"],
    ),
];

/// Category of a package, from its name.
pub fn categorize(name: &str) -> DependencyCategory {
    let name = name.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| name.contains(n)))
        .map(|(category, _)| *category)
        .unwrap_or(DependencyCategory::Other)
}

/// Extract declared dependencies from the manifest in `root`.
///
/// Production, development, then peer dependencies, each sorted by name.
/// Returns an empty list if the manifest is missing or malformed.
pub fn extract_dependencies(root: &Path) -> Vec<Dependency> {
    match PackageManifest::load(root) {
        Some(manifest) => dependencies_from_manifest(&manifest),
        None => Vec::new(),
    }
}

pub fn dependencies_from_manifest(manifest: &PackageManifest) -> Vec<Dependency> {
    let groups = [
        (&manifest.dependencies, DependencyType::Production),
        (&manifest.dev_dependencies, DependencyType::Development),
        (&manifest.peer_dependencies, DependencyType::Peer),
    ];

    groups
        .iter()
        .flat_map(|(map, dep_type)| {
            map.iter().map(move |(name, version)| Dependency {
                name: name.clone(),
                version: version_string(version),
                dep_type: *dep_type,
                category: Some(categorize(name)),
            })
        })
        .collect()
}
