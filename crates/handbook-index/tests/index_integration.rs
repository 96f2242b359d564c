//! End-to-end tests for building an index from a content directory.

use std::collections::BTreeMap;
use std::path::Path;

use handbook_content::markdown::extract_headings;
use handbook_core::heading_anchor;
use handbook_index::{CategorySource, CategoryResolver, IndexBuilder, DEFAULT_ORDER};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn handbook() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "algorithmic-fairness/algorithmic-fairness.md",
        "---\ntitle: Algorithmic Fairness\norder: 1\n---\n\n# Welcome\n\n## What Is   Fairness?\n\nSee [nav:Group](group-fairness).\n\n## Pre- and Post-processing\n",
    );
    write(
        root,
        "privacy/privacy.md",
        "---\norder: 2\ncategory: basics\n---\n# Privacy Primer\n",
    );
    write(
        root,
        "algorithmic-fairness/group-fairness/group-fairness.md",
        "---\norder: 3\nfinal: false\n---\n# Group Fairness\n\n## Equalized Odds (EO)\n",
    );
    write(
        root,
        "algorithmic-fairness/intro/intro.md",
        "---\norder: 1\n---\n# Intro\n",
    );
    write(
        root,
        "algorithmic-fairness/unordered/unordered.md",
        "# Unordered\n",
    );
    write(
        root,
        "algorithmic-fairness/metrics/metrics.md",
        "---\norder: 2\n---\n# Metrics\n",
    );
    write(
        root,
        "algorithmic-fairness/group-fairness/drawer/parity.md",
        "# Statistical Parity\n\nEqual rates.\n",
    );

    dir
}

#[tokio::test]
async fn subsections_sort_by_order_with_default_last() {
    let dir = handbook();
    let (index, _) = IndexBuilder::new()
        .with_content_path(dir.path())
        .build()
        .await
        .unwrap();

    let orders: Vec<_> = index
        .subsections_of("algorithmic-fairness")
        .iter()
        .map(|s| s.order)
        .collect();
    assert_eq!(orders, vec![1, 2, 3, DEFAULT_ORDER]);
}

#[tokio::test]
async fn lookups_return_none_for_missing_ids() {
    let dir = handbook();
    let (index, _) = IndexBuilder::new()
        .with_content_path(dir.path())
        .build()
        .await
        .unwrap();

    assert!(index.section("nope").is_none());
    assert!(index.subsection("privacy", "nope").is_none());
    assert!(index.subsection("nope", "intro").is_none());
    assert!(index.drawer_note("algorithmic-fairness", "group-fairness", "nope").is_none());
    assert!(index.drawer_notes_of("privacy", "anything").is_empty());
    assert!(index.subsections_of("nope").is_empty());

    let note = index
        .drawer_note("algorithmic-fairness", "group-fairness", "parity")
        .unwrap();
    assert_eq!(note.title, "Statistical Parity");
}

#[tokio::test]
async fn find_page_resolves_sections_then_subsections() {
    let dir = handbook();
    let (index, _) = IndexBuilder::new()
        .with_content_path(dir.path())
        .build()
        .await
        .unwrap();

    assert!(index.find_page("privacy").unwrap().is_section());
    let sub = index.find_page("group-fairness").unwrap();
    assert_eq!(sub.section_id.as_deref(), Some("algorithmic-fairness"));
    assert!(index.find_page("parity").is_none());
}

#[tokio::test]
async fn nav_tree_anchors_match_heading_anchor() {
    let dir = handbook();
    let (index, _) = IndexBuilder::new()
        .with_content_path(dir.path())
        .build()
        .await
        .unwrap();

    let tree = index.nav_tree();
    let section = tree.section("algorithmic-fairness").unwrap();

    assert_eq!(section.title, "Algorithmic Fairness");
    let anchors: Vec<_> = section.anchors.iter().map(|a| a.anchor.as_str()).collect();
    assert_eq!(anchors, vec!["what-is-fairness", "pre-and-post-processing"]);

    for anchor in &section.anchors {
        assert_eq!(anchor.anchor, heading_anchor(&anchor.title));
    }

    let group = section
        .subsections
        .iter()
        .find(|s| s.id == "group-fairness")
        .unwrap();
    assert!(group.beta);
    assert_eq!(group.route, "/algorithmic-fairness/group-fairness");
    assert_eq!(group.anchors[0].anchor, "equalized-odds-eo");

    let intro = section.subsections.iter().find(|s| s.id == "intro").unwrap();
    assert!(!intro.beta);
}

#[tokio::test]
async fn nav_tree_serializes_to_json() {
    let dir = handbook();
    let (index, _) = IndexBuilder::new()
        .with_content_path(dir.path())
        .build()
        .await
        .unwrap();

    let json = serde_json::to_value(index.nav_tree()).unwrap();
    assert_eq!(json["sections"][0]["id"], "algorithmic-fairness");
    assert_eq!(json["sections"][1]["id"], "privacy");
    assert_eq!(json["sections"][0]["subsections"][2]["beta"], true);
}

#[tokio::test]
async fn nav_tree_groups_by_category() {
    let dir = handbook();
    let (index, _) = IndexBuilder::new()
        .with_content_path(dir.path())
        .build()
        .await
        .unwrap();

    let groups = index.nav_tree().grouped(index.categories());
    let ids: Vec<_> = groups.iter().map(|g| g.category.id.as_str()).collect();
    assert_eq!(ids, vec!["basics", "algorithmic-fairness"]);
    assert_eq!(groups[0].sections[0].id, "privacy");
}

#[tokio::test]
async fn section_title_matches_reparsed_heading_text() {
    let dir = handbook();
    let (index, _) = IndexBuilder::new()
        .with_content_path(dir.path())
        .build()
        .await
        .unwrap();

    // Without a frontmatter title the nav entry comes from the first H1.
    let privacy = index.section("privacy").unwrap();
    assert_eq!(privacy.title, "Privacy Primer");

    let headings = extract_headings(&privacy.body, 1);
    assert_eq!(headings[0].text, privacy.title);
}

#[tokio::test]
async fn declared_mapping_overrides_heuristic() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "justice-department-case-study/justice-department-case-study.md",
        "# Case\n",
    );

    let mut mapping = BTreeMap::new();
    mapping.insert(
        "justice-department-case-study".to_string(),
        "case-studies".to_string(),
    );

    let (index, _) = IndexBuilder::new()
        .with_content_path(dir.path())
        .with_category_mapping(mapping.clone())
        .with_inferred_categories(true)
        .build()
        .await
        .unwrap();

    let section = index.section("justice-department-case-study").unwrap();
    assert_eq!(section.category, "case-studies");

    let fm = handbook_content::extract_frontmatter("# Case\n");
    let resolved = CategoryResolver::new()
        .with_mapping(mapping)
        .resolve("justice-department-case-study", &fm);
    assert_eq!(resolved.source, CategorySource::Declared);
}

#[tokio::test]
async fn fingerprint_and_timestamp_recorded() {
    let dir = handbook();
    let before = chrono::Utc::now();
    let (index, _) = IndexBuilder::new()
        .with_content_path(dir.path())
        .build()
        .await
        .unwrap();

    assert_eq!(index.fingerprint().len(), 16);
    assert!(index.loaded_at() >= before);
    assert_eq!(index.page_count(), 6);
    assert_eq!(index.note_count(), 1);
}
