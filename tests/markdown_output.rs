//! Tests for the markdown documents rendered from the fixture project.
//!
//! Section headings and table headers are parsed by downstream tooling,
//! so these tests pin them exactly.

use std::path::PathBuf;

use repolens::{
    analyze, render_context, render_modification_context, render_report, CodebaseAnalysis,
    FileSummaries, MarkdownRenderer, ReportConfig,
};

fn fixture() -> CodebaseAnalysis {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/next-app");
    analyze(path).expect("fixture should analyze")
}

/// Level-two headings in document order.
fn sections(doc: &str) -> Vec<&str> {
    doc.lines()
        .filter_map(|l| l.strip_prefix("## "))
        .collect()
}

#[test]
fn test_report_sections_match_toc() {
    let report = render_report(&fixture(), None);
    assert_eq!(
        sections(&report),
        vec![
            "Table of Contents",
            "Tech Stack",
            "Statistics",
            "Key Files",
            "Entry Points",
            "API Endpoints",
            "Dependencies",
            "Project Structure",
        ]
    );
    for anchor in [
        "(#tech-stack)",
        "(#statistics)",
        "(#key-files)",
        "(#entry-points)",
        "(#api-endpoints)",
        "(#dependencies)",
        "(#project-structure)",
    ] {
        assert!(report.contains(anchor), "missing anchor {}", anchor);
    }
}

#[test]
fn test_report_table_headers() {
    let report = render_report(&fixture(), None);
    assert!(report.contains("| Category | Technology |"));
    assert!(report.contains("| Language | Files | Lines |"));
    assert!(report.contains("| File | Type | Lines |"));
    assert!(report.contains("| Method | Path | File |"));
}

#[test]
fn test_report_content() {
    let report = render_report(&fixture(), None);

    assert!(report.starts_with("# next-app\n"));
    assert!(report.contains("| Framework | nextjs |"));
    assert!(report.contains("| Deployment | docker |"));
    assert!(report.contains("| Total Files | 12 |"));
    assert!(report.contains("#### `src/app/page.tsx`"));
    assert!(report.contains("| DELETE | `/api/widgets/:id` | `src/app/api/widgets/[id]/route.ts` |"));
    assert!(report.contains("#### Database\n\n- `@prisma/client` (^5.10.0)"));
    assert!(report.contains("#### Auth\n\n- `next-auth` (^4.24.5)"));
    assert!(report.contains("### Peer\n\n`react`"));
}

#[test]
fn test_report_structure_tree() {
    let report = render_report(&fixture(), None);
    let tree = report
        .split("## Project Structure")
        .nth(1)
        .expect("structure section present");

    assert!(tree.contains("next-app/\n├── scripts/\n│   └── seed.sh\n├── src/\n"));
    assert!(tree.contains("│   ├── app/\n"));
    assert!(tree.contains("└── tsconfig.json\n"));
    // Default tree depth stops below src/app/api.
    assert!(tree.contains("│   │   ├── api/\n"));
    assert!(!tree.contains("widgets/"));
}

#[test]
fn test_report_with_summaries() {
    let mut summaries = FileSummaries::new();
    summaries.insert(
        "src/app/layout.tsx".to_string(),
        "Root layout shared by every page.".to_string(),
    );
    let report = render_report(&fixture(), Some(&summaries));
    assert!(report.contains("> Root layout shared by every page."));
}

#[test]
fn test_context_documents() {
    let analysis = fixture();

    let context = render_context(&analysis);
    assert!(context.contains("next-app is a Next.js project written in typescript"));
    assert!(context.contains("- **API endpoints:** 3"));
    assert!(context.contains("- `src/app/layout.tsx` (entry)"));

    let modification = render_modification_context(&analysis, "Add widget search");
    assert_eq!(
        sections(&modification),
        vec![
            "Goal",
            "Project Overview",
            "Files Likely to Change",
            "Current API Endpoints",
            "General Approach",
        ]
    );
    assert!(modification.contains("- `GET /api/health` in `src/app/api/health/route.ts`"));
}

#[test]
fn test_renderer_limits() {
    let analysis = fixture();
    let renderer = MarkdownRenderer::new(ReportConfig {
        max_context_files: 1,
        max_files_per_dir: 1,
        ..Default::default()
    });

    let context = renderer.context(&analysis);
    assert!(context.contains("src/app/layout.tsx"));
    assert!(!context.contains("- `src/app/page.tsx` (entry)"));

    let report = renderer.report(&analysis, None);
    assert!(report.contains("└── ... +3 more files\n"));
}

#[test]
fn test_rendering_is_pure() {
    let analysis = fixture();
    assert_eq!(render_report(&analysis, None), render_report(&analysis, None));
    assert_eq!(render_context(&analysis), render_context(&analysis));
}
