//! IndexBuilder for loading a content directory.
//!
//! The builder orchestrates discovery and indexing:
//!
//! 1. Discover markdown files under the content root
//! 2. Classify each file by its place in the directory layout
//! 3. Parse frontmatter, resolve category, title and order
//! 4. Sort siblings and assemble the [`ContentIndex`] snapshot
//!
//! A file that cannot be read does not fail the build: it becomes a
//! placeholder entry (title `Error: <id>`, category `errors`) and is listed
//! in [`BuildStats::errors`]. Only a content root that cannot be enumerated
//! at all is an error.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use handbook_content::extract_frontmatter;
use handbook_core::util::files::find_markdown_files;
use handbook_core::{Error, Result};

use crate::category::{Category, CategoryResolver};
use crate::fingerprint::content_fingerprint;
use crate::index::{ContentIndex, IndexParts};
use crate::layout::{classify, FileRole};
use crate::model::{
    placeholder_body, placeholder_page, sort_notes, sort_pages, DrawerNote, EntryMeta, Page,
    PLACEHOLDER_ORDER,
};

/// Top-level directories skipped unless configured otherwise.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["primers"];

// ============================================================================
// Build statistics
// ============================================================================

/// A file that failed to load.
#[derive(Debug, Clone)]
pub struct BuildError {
    /// Path to the problematic file.
    pub file: PathBuf,
    /// Error message.
    pub message: String,
}

/// Statistics from an index build.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Markdown files discovered.
    pub files_processed: usize,
    /// Sections indexed.
    pub sections: usize,
    /// Subsections indexed.
    pub subsections: usize,
    /// Drawer notes indexed.
    pub drawer_notes: usize,
    /// Files outside the layout convention or excluded.
    pub ignored: usize,
    /// Files replaced by placeholder entries.
    pub errors: Vec<BuildError>,
    /// Bytes of markdown read.
    pub bytes_read: u64,
}

impl BuildStats {
    /// Whether every discovered page file loaded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

// ============================================================================
// IndexBuilder
// ============================================================================

/// Builder for a [`ContentIndex`].
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    content_path: Option<PathBuf>,
    excluded_dirs: Vec<String>,
    categories: CategoryResolver,
    default_section: Option<String>,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexBuilder {
    /// Creates a builder with the default exclusions and no content path.
    pub fn new() -> Self {
        Self {
            content_path: None,
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            categories: CategoryResolver::new(),
            default_section: None,
        }
    }

    /// Sets the content directory path.
    pub fn with_content_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.content_path = Some(path.into());
        self
    }

    /// Replaces the excluded top-level directory names.
    pub fn with_excluded_dirs(mut self, dirs: Vec<String>) -> Self {
        self.excluded_dirs = dirs;
        self
    }

    /// Declares content-id → category mappings.
    pub fn with_category_mapping(mut self, mapping: BTreeMap<String, String>) -> Self {
        self.categories = self.categories.with_mapping(mapping);
        self
    }

    /// Enables the filename-substring category heuristic.
    pub fn with_inferred_categories(mut self, enabled: bool) -> Self {
        self.categories = self.categories.with_inference(enabled);
        self
    }

    /// Sets the section shown for `/`.
    pub fn with_default_section(mut self, id: Option<String>) -> Self {
        self.default_section = id;
        self
    }

    /// Builds the index.
    pub async fn build(&self) -> Result<(ContentIndex, BuildStats)> {
        let root = self
            .content_path
            .as_ref()
            .ok_or_else(|| Error::config("Content path not set. Use with_content_path() first."))?
            .clone();

        log::info!("Loading content from {}", root.display());

        let files = find_markdown_files(&root).await?;
        let mut stats = BuildStats::default();
        let mut acc = Accumulator::default();

        for file in &files {
            stats.files_processed += 1;

            let role = classify(&root, file, &self.excluded_dirs);
            if let FileRole::Ignored(reason) = role {
                log::debug!("Ignoring {} ({reason:?})", file.display());
                stats.ignored += 1;
                continue;
            }

            let content = match tokio::fs::read_to_string(file).await {
                Ok(content) => {
                    stats.bytes_read += content.len() as u64;
                    Ok(content)
                }
                Err(e) => {
                    let err = Error::io_with_path(e, file);
                    log::warn!("Using placeholder for unreadable file: {err}");
                    stats.errors.push(BuildError {
                        file: file.clone(),
                        message: err.to_string(),
                    });
                    Err(err.to_string())
                }
            };

            let content = content.as_deref().map_err(String::as_str);
            self.index_file(&mut acc, role, file, content);
        }

        let mut sections = acc.sections;
        sort_pages(&mut sections);
        for subs in acc.subsections.values_mut() {
            sort_pages(subs);
        }
        for notes in acc.notes.values_mut().flat_map(|m| m.values_mut()) {
            sort_notes(notes);
        }

        stats.sections = sections.len();
        stats.subsections = acc.subsections.values().map(Vec::len).sum();
        stats.drawer_notes = acc.notes.values().flat_map(|m| m.values()).map(Vec::len).sum();

        for section_id in acc.subsections.keys() {
            if !sections.iter().any(|s| &s.id == section_id) {
                log::warn!("Subsections found under '{section_id}' but it has no {section_id}.md");
            }
        }

        if sections.is_empty() {
            log::warn!("No sections found under {}", root.display());
        }

        let mut categories: Vec<Category> = acc.categories.into_values().collect();
        categories.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

        let fingerprint = content_fingerprint(&root).await?;

        log::info!(
            "Indexed {} sections, {} subsections, {} drawer notes ({} ignored, {} errors)",
            stats.sections,
            stats.subsections,
            stats.drawer_notes,
            stats.ignored,
            stats.errors.len()
        );

        let index = ContentIndex::from_parts(IndexParts {
            root,
            sections,
            subsections: acc.subsections,
            notes: acc.notes,
            categories,
            default_section: self.default_section.clone(),
            fingerprint,
        });

        Ok((index, stats))
    }

    fn index_file(
        &self,
        acc: &mut Accumulator,
        role: FileRole,
        path: &Path,
        content: std::result::Result<&str, &str>,
    ) {
        match role {
            FileRole::Section { section } => {
                let page = self.page(acc, &section, None, path, content);
                acc.sections.push(page);
            }
            FileRole::Subsection {
                section,
                subsection,
            } => {
                let page = self.page(acc, &subsection, Some(&section), path, content);
                acc.subsections.entry(section).or_default().push(page);
            }
            FileRole::DrawerNote {
                section,
                subsection,
                note,
            } => {
                let note = self.note(acc, &note, &section, &subsection, path, content);
                acc.notes
                    .entry(section)
                    .or_default()
                    .entry(subsection)
                    .or_default()
                    .push(note);
            }
            FileRole::Ignored(_) => {}
        }
    }

    fn page(
        &self,
        acc: &mut Accumulator,
        id: &str,
        section_id: Option<&str>,
        path: &Path,
        content: std::result::Result<&str, &str>,
    ) -> Page {
        let content = match content {
            Ok(content) => content,
            Err(message) => {
                acc.register(Category::errors());
                return placeholder_page(id, section_id, path, message);
            }
        };

        let frontmatter = extract_frontmatter(content);
        let resolved = self.categories.resolve(id, &frontmatter);
        acc.register(resolved.category.clone());

        EntryMeta::derive(id, &frontmatter, resolved).into_page(
            id,
            section_id,
            frontmatter.body(),
            path,
        )
    }

    fn note(
        &self,
        acc: &mut Accumulator,
        id: &str,
        section_id: &str,
        subsection_id: &str,
        path: &Path,
        content: std::result::Result<&str, &str>,
    ) -> DrawerNote {
        let mut note = DrawerNote {
            id: id.to_string(),
            section_id: section_id.to_string(),
            subsection_id: subsection_id.to_string(),
            title: String::new(),
            order: PLACEHOLDER_ORDER,
            category: String::new(),
            body: String::new(),
            path: path.to_path_buf(),
            placeholder: false,
        };

        match content {
            Ok(content) => {
                let frontmatter = extract_frontmatter(content);
                let resolved = self.categories.resolve(id, &frontmatter);
                acc.register(resolved.category.clone());
                let meta = EntryMeta::derive(id, &frontmatter, resolved);

                note.title = meta.title;
                note.order = meta.order;
                note.category = meta.category.id;
                note.body = frontmatter.body().to_string();
            }
            Err(message) => {
                let errors = Category::errors();
                note.title = format!("Error: {id}");
                note.category = errors.id.clone();
                note.body = placeholder_body(path, message);
                note.placeholder = true;
                acc.register(errors);
            }
        }

        note
    }
}

#[derive(Default)]
struct Accumulator {
    sections: Vec<Page>,
    subsections: HashMap<String, Vec<Page>>,
    notes: HashMap<String, HashMap<String, Vec<DrawerNote>>>,
    categories: BTreeMap<String, Category>,
}

impl Accumulator {
    /// The first occurrence of a category fixes its name and order.
    fn register(&mut self, category: Category) {
        self.categories.entry(category.id.clone()).or_insert(category);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    async fn setup_content() -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let root = dir.path().join("markdown");
        std::fs::create_dir(&root).unwrap();

        write(&root, "fairness/fairness.md", "---\norder: 1\n---\n# Fairness\n\n## Why It Matters\n");
        write(&root, "privacy/privacy.md", "---\norder: 2\n---\n# Privacy\n");
        write(&root, "fairness/group/group.md", "---\norder: 3\nfinal: false\n---\n# Group\n");
        write(&root, "fairness/individual/individual.md", "---\norder: 1\n---\n# Individual\n");
        write(&root, "fairness/metrics/metrics.md", "# Metrics\n");
        write(&root, "fairness/causal/causal.md", "---\norder: 2\n---\n# Causal\n");
        write(&root, "fairness/group/drawer/parity.md", "# Statistical Parity\n");
        write(&root, "fairness/group/drawer/odds.md", "---\norder: 1\n---\n# Odds\n");
        write(&root, "fairness/notes.md", "stray\n");
        write(&root, "primers/primers.md", "# Legacy\n");

        (dir, root)
    }

    #[tokio::test]
    async fn test_builder_basic() {
        let (_dir, root) = setup_content().await;

        let (index, stats) = IndexBuilder::new()
            .with_content_path(&root)
            .build()
            .await
            .unwrap();

        assert_eq!(stats.files_processed, 10);
        assert_eq!(stats.sections, 2);
        assert_eq!(stats.subsections, 4);
        assert_eq!(stats.drawer_notes, 2);
        assert_eq!(stats.ignored, 2);
        assert!(stats.is_clean());
        assert!(stats.bytes_read > 0);

        let ids: Vec<_> = index.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["fairness", "privacy"]);
    }

    #[tokio::test]
    async fn test_builder_sorts_subsections() {
        let (_dir, root) = setup_content().await;
        let (index, _) = IndexBuilder::new().with_content_path(&root).build().await.unwrap();

        let orders: Vec<_> = index.subsections_of("fairness").iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 999]);

        let notes: Vec<_> = index
            .drawer_notes_of("fairness", "group")
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(notes, vec!["odds", "parity"]);
    }

    #[tokio::test]
    async fn test_builder_excluded_dirs_configurable() {
        let (_dir, root) = setup_content().await;
        let (index, stats) = IndexBuilder::new()
            .with_content_path(&root)
            .with_excluded_dirs(Vec::new())
            .build()
            .await
            .unwrap();

        assert_eq!(stats.ignored, 1);
        assert!(index.section("primers").is_some());
    }

    #[tokio::test]
    async fn test_builder_missing_content_path() {
        let result = IndexBuilder::new().build().await;
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[tokio::test]
    async fn test_builder_missing_root_is_error() {
        let dir = tempdir().unwrap();
        let result = IndexBuilder::new()
            .with_content_path(dir.path().join("nope"))
            .build()
            .await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_builder_empty_directory() {
        let dir = tempdir().unwrap();
        let (index, stats) = IndexBuilder::new()
            .with_content_path(dir.path())
            .build()
            .await
            .unwrap();

        assert!(index.is_empty());
        assert_eq!(stats.files_processed, 0);
        assert!(index.default_section().is_none());
    }

    #[tokio::test]
    async fn test_builder_unreadable_file_becomes_placeholder() {
        let dir = tempdir().unwrap();
        write(dir.path(), "good/good.md", "# Good\n");
        let bad = dir.path().join("bad/bad.md");
        std::fs::create_dir_all(bad.parent().unwrap()).unwrap();
        std::fs::write(&bad, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let (index, stats) = IndexBuilder::new()
            .with_content_path(dir.path())
            .build()
            .await
            .unwrap();

        assert_eq!(stats.errors.len(), 1);
        assert_eq!(stats.errors[0].file, bad);

        let placeholder = index.section("bad").unwrap();
        assert!(placeholder.placeholder);
        assert_eq!(placeholder.title, "Error: bad");
        assert_eq!(placeholder.category, "errors");
        assert_eq!(index.sections().last().unwrap().id, "bad");
        assert!(index.category("errors").is_some());
    }

    #[tokio::test]
    async fn test_builder_default_section() {
        let (_dir, root) = setup_content().await;

        let (index, _) = IndexBuilder::new()
            .with_content_path(&root)
            .with_default_section(Some("privacy".to_string()))
            .build()
            .await
            .unwrap();
        assert_eq!(index.default_section().unwrap().id, "privacy");

        let (index, _) = IndexBuilder::new()
            .with_content_path(&root)
            .with_default_section(Some("missing".to_string()))
            .build()
            .await
            .unwrap();
        assert_eq!(index.default_section().unwrap().id, "fairness");
    }

    #[tokio::test]
    async fn test_builder_categories_sorted() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a/a.md", "---\ncategory: appendix\n---\n# A\n");
        write(dir.path(), "b/b.md", "---\ncategory: introduction\n---\n# B\n");
        write(dir.path(), "c/c.md", "# C\n");

        let (index, _) = IndexBuilder::new()
            .with_content_path(dir.path())
            .build()
            .await
            .unwrap();

        let ids: Vec<_> = index.categories().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["introduction", "algorithmic-fairness", "appendix"]);
    }
}
