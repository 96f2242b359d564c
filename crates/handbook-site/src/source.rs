//! Where the controller gets its content from.
//!
//! [`ContentSource`] is the seam between the page controller and storage.
//! [`IndexSource`] serves an in-memory [`ContentIndex`] snapshot built from
//! a content directory; the snapshot is swapped whole on reload so readers
//! never see a half-built index.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use handbook_core::{LibraryStatus, Result, StatusHandle};
use handbook_index::{ContentIndex, DrawerNote, IndexBuilder, Page};
use tokio::sync::watch;

use crate::location::Location;

/// A page resolved for display.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// Canonical location of the page (root resolved, no anchor)
    pub location: Location,
    pub page: Page,
    /// Ids of the drawer notes this page can open
    pub drawer_ids: BTreeSet<String>,
}

/// What a reload found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadSummary {
    /// Whether the content fingerprint differs from the previous snapshot
    pub changed: bool,
    pub fingerprint: String,
    pub pages: usize,
    pub notes: usize,
}

/// Supplies pages and drawer notes to the page controller.
///
/// `Ok(None)` means the content set is fine but has nothing at that
/// location; `Err` means the content set itself could not be loaded.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Resolve a location (anchor ignored) to a page.
    async fn page(&self, location: &Location) -> Result<Option<PageContent>>;

    /// Resolve a bare `[nav:]` target to a location.
    async fn resolve_target(&self, target: &str) -> Result<Option<Location>>;

    /// Look up a drawer note of a subsection.
    async fn drawer_note(
        &self,
        section_id: &str,
        subsection_id: &str,
        note_id: &str,
    ) -> Result<Option<DrawerNote>>;

    /// Discard everything and load the content set again.
    async fn reload(&self) -> Result<ReloadSummary>;

    /// Source name for diagnostics.
    fn name(&self) -> &str;
}

/// How long a request waits on a load started by another request.
const LOAD_WAIT: Duration = Duration::from_secs(30);

/// A [`ContentSource`] backed by a [`ContentIndex`].
///
/// The first request loads the index if it was not loaded up front. A
/// failed load leaves no snapshot, so the next request tries again.
pub struct IndexSource {
    builder: IndexBuilder,
    snapshot: watch::Sender<Option<Arc<ContentIndex>>>,
    status: StatusHandle,
}

impl IndexSource {
    /// A source that loads lazily with `builder`.
    pub fn new(builder: IndexBuilder) -> Self {
        let (snapshot, _rx) = watch::channel(None);
        Self {
            builder,
            snapshot,
            status: StatusHandle::new(),
        }
    }

    /// A source serving an index that was already built with `builder`.
    pub fn with_index(builder: IndexBuilder, index: ContentIndex) -> Self {
        let source = Self::new(builder);
        source.status.set_status(availability(&index, 0));
        source.snapshot.send_replace(Some(Arc::new(index)));
        source
    }

    /// Load status of the content set.
    pub fn status(&self) -> &StatusHandle {
        &self.status
    }

    /// The current snapshot, if one is loaded.
    pub fn snapshot(&self) -> Option<Arc<ContentIndex>> {
        self.snapshot.borrow().clone()
    }

    /// The current snapshot, loading it first if needed.
    ///
    /// A caller that finds a first load in progress waits for it instead of
    /// starting another build.
    pub async fn index(&self) -> Result<Arc<ContentIndex>> {
        if let Some(index) = self.snapshot() {
            return Ok(index);
        }
        if self.status.status() == LibraryStatus::Loading
            && self.status.wait_ready(LOAD_WAIT).await.is_ok()
        {
            if let Some(index) = self.snapshot() {
                return Ok(index);
            }
        }
        self.load().await
    }

    async fn load(&self) -> Result<Arc<ContentIndex>> {
        self.status.set_status(LibraryStatus::Loading);

        match self.builder.build().await {
            Ok((index, stats)) => {
                log::info!(
                    "Loaded {} pages and {} drawer notes ({} bytes, {} ignored files)",
                    index.page_count(),
                    index.note_count(),
                    stats.bytes_read,
                    stats.ignored
                );
                let status = availability(&index, stats.errors.len());
                let index = Arc::new(index);
                self.snapshot.send_replace(Some(Arc::clone(&index)));
                self.status.set_status(status);
                Ok(index)
            }
            Err(e) => {
                log::error!("Failed to load content: {e}");
                self.snapshot.send_replace(None);
                self.status.set_status(LibraryStatus::Failed(e.to_string()));
                Err(e)
            }
        }
    }
}

fn availability(index: &ContentIndex, failed_files: usize) -> LibraryStatus {
    if index.is_empty() {
        LibraryStatus::Degraded("no sections found".to_string())
    } else if failed_files > 0 {
        LibraryStatus::Degraded(format!("{failed_files} file(s) could not be read"))
    } else {
        LibraryStatus::Ready
    }
}

/// Resolve a location against an index.
pub fn resolve_page(index: &ContentIndex, location: &Location) -> Option<PageContent> {
    let (page, location) = match (&location.section, &location.subsection) {
        (None, _) => {
            let page = index.default_section()?;
            (page, Location::section(&page.id))
        }
        (Some(section), None) => (index.section(section)?, location.without_anchor()),
        (Some(section), Some(sub)) => (index.subsection(section, sub)?, location.without_anchor()),
    };

    let drawer_ids = match (&location.section, &location.subsection) {
        (Some(section), Some(sub)) => index
            .drawer_notes_of(section, sub)
            .iter()
            .map(|n| n.id.clone())
            .collect(),
        _ => BTreeSet::new(),
    };

    Some(PageContent {
        location,
        page: page.clone(),
        drawer_ids,
    })
}

#[async_trait]
impl ContentSource for IndexSource {
    async fn page(&self, location: &Location) -> Result<Option<PageContent>> {
        let index = self.index().await?;
        Ok(resolve_page(&index, location))
    }

    async fn resolve_target(&self, target: &str) -> Result<Option<Location>> {
        let index = self.index().await?;
        Ok(index.find_page(target).map(|page| match &page.section_id {
            Some(section) => Location::subsection(section, &page.id),
            None => Location::section(&page.id),
        }))
    }

    async fn drawer_note(
        &self,
        section_id: &str,
        subsection_id: &str,
        note_id: &str,
    ) -> Result<Option<DrawerNote>> {
        let index = self.index().await?;
        Ok(index
            .drawer_note(section_id, subsection_id, note_id)
            .cloned())
    }

    async fn reload(&self) -> Result<ReloadSummary> {
        let previous = self.snapshot().map(|index| index.fingerprint().to_string());
        let index = self.load().await?;

        Ok(ReloadSummary {
            changed: previous.as_deref() != Some(index.fingerprint()),
            fingerprint: index.fingerprint().to_string(),
            pages: index.page_count(),
            notes: index.note_count(),
        })
    }

    fn name(&self) -> &str {
        "index"
    }
}

impl std::fmt::Debug for IndexSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexSource")
            .field("status", &self.status.status())
            .field("loaded", &self.snapshot.borrow().is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn content() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "fairness/fairness.md", "---\norder: 2\n---\n# Fairness\n");
        write(dir.path(), "privacy/privacy.md", "---\norder: 1\n---\n# Privacy\n");
        write(dir.path(), "privacy/consent/consent.md", "# Consent\n");
        write(dir.path(), "privacy/consent/drawer/gdpr.md", "# GDPR\n");
        dir
    }

    #[tokio::test]
    async fn test_lazy_load_and_status() {
        let dir = content();
        let source = IndexSource::new(IndexBuilder::new().with_content_path(dir.path()));
        assert_eq!(source.status().status(), LibraryStatus::Empty);
        assert!(source.snapshot().is_none());

        let page = source.page(&Location::section("privacy")).await.unwrap();
        assert_eq!(page.unwrap().page.title, "Privacy");
        assert!(source.status().status().is_ready());
        source
            .status()
            .wait_ready(Duration::from_millis(10))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_root_resolves_to_first_section() {
        let dir = content();
        let source = IndexSource::new(IndexBuilder::new().with_content_path(dir.path()));
        let page = source.page(&Location::root()).await.unwrap().unwrap();
        assert_eq!(page.location, Location::section("privacy"));
    }

    #[tokio::test]
    async fn test_root_honors_configured_default() {
        let dir = content();
        let builder = IndexBuilder::new()
            .with_content_path(dir.path())
            .with_default_section(Some("fairness".into()));
        let source = IndexSource::new(builder);
        let page = source.page(&Location::root()).await.unwrap().unwrap();
        assert_eq!(page.page.id, "fairness");
    }

    #[tokio::test]
    async fn test_subsection_carries_drawer_ids() {
        let dir = content();
        let source = IndexSource::new(IndexBuilder::new().with_content_path(dir.path()));
        let page = source
            .page(&Location::subsection("privacy", "consent").with_anchor("x"))
            .await
            .unwrap()
            .unwrap();
        assert!(page.drawer_ids.contains("gdpr"));
        assert_eq!(page.location.anchor, None);

        assert!(source
            .page(&Location::subsection("fairness", "consent"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_resolve_nav_target() {
        let dir = content();
        let source = IndexSource::new(IndexBuilder::new().with_content_path(dir.path()));
        assert_eq!(
            source.resolve_target("consent").await.unwrap(),
            Some(Location::subsection("privacy", "consent"))
        );
        assert_eq!(
            source.resolve_target("fairness").await.unwrap(),
            Some(Location::section("fairness"))
        );
        assert_eq!(source.resolve_target("gdpr").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_root_fails_then_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("markdown");
        let source = IndexSource::new(IndexBuilder::new().with_content_path(&root));

        assert!(source.page(&Location::root()).await.is_err());
        assert!(source.status().status().is_failed());

        write(&root, "privacy/privacy.md", "# Privacy\n");
        let page = source.page(&Location::root()).await.unwrap();
        assert!(page.is_some());
    }

    #[tokio::test]
    async fn test_reload_reports_changes() {
        let dir = content();
        let source = IndexSource::new(IndexBuilder::new().with_content_path(dir.path()));
        source.index().await.unwrap();

        let summary = source.reload().await.unwrap();
        assert!(!summary.changed);
        assert_eq!(summary.pages, 3);
        assert_eq!(summary.notes, 1);

        write(dir.path(), "ethics/ethics.md", "# Ethics\n");
        let summary = source.reload().await.unwrap();
        assert!(summary.changed);
        assert_eq!(summary.pages, 4);
    }

    #[tokio::test]
    async fn test_concurrent_first_loads_share_one_snapshot() {
        let dir = content();
        let source = IndexSource::new(IndexBuilder::new().with_content_path(dir.path()));

        let (a, b) = tokio::join!(source.index(), source.index());
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert!(source.status().status().is_ready());
    }

    #[tokio::test]
    async fn test_reload_reenters_loading_and_settles() {
        let dir = content();
        let source = IndexSource::new(IndexBuilder::new().with_content_path(dir.path()));
        source.index().await.unwrap();

        let mut rx = source.status().subscribe();
        rx.borrow_and_update();

        source.reload().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), LibraryStatus::Ready);

        std::fs::remove_dir_all(dir.path()).unwrap();
        assert!(source.reload().await.is_err());
        assert!(rx.borrow_and_update().is_failed());
        assert!(source.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_empty_content_is_degraded() {
        let dir = tempfile::tempdir().unwrap();
        let source = IndexSource::new(IndexBuilder::new().with_content_path(dir.path()));
        assert!(source.page(&Location::root()).await.unwrap().is_none());
        assert!(matches!(
            source.status().status(),
            LibraryStatus::Degraded(_)
        ));
    }
}
