//! The content index: an immutable snapshot of every loaded entry.
//!
//! All lookups return `Option` so a missing id stays distinguishable from a
//! failure to load the content set (which is an `Error` from the builder).
//! The index is never mutated after it is built; a reload builds a new one
//! and callers swap an `Arc`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::category::Category;
use crate::model::{DrawerNote, Page};
use crate::nav::{NavSection, NavTree};

/// Loaded, sorted content.
#[derive(Debug, Clone)]
pub struct ContentIndex {
    root: PathBuf,
    sections: Vec<Page>,
    subsections: HashMap<String, Vec<Page>>,
    notes: HashMap<String, HashMap<String, Vec<DrawerNote>>>,
    categories: Vec<Category>,
    default_section: Option<String>,
    fingerprint: String,
    loaded_at: DateTime<Utc>,
}

/// Parts assembled by the builder; each list already sorted.
pub(crate) struct IndexParts {
    pub root: PathBuf,
    pub sections: Vec<Page>,
    pub subsections: HashMap<String, Vec<Page>>,
    pub notes: HashMap<String, HashMap<String, Vec<DrawerNote>>>,
    pub categories: Vec<Category>,
    pub default_section: Option<String>,
    pub fingerprint: String,
}

impl ContentIndex {
    pub(crate) fn from_parts(parts: IndexParts) -> Self {
        Self {
            root: parts.root,
            sections: parts.sections,
            subsections: parts.subsections,
            notes: parts.notes,
            categories: parts.categories,
            default_section: parts.default_section,
            fingerprint: parts.fingerprint,
            loaded_at: Utc::now(),
        }
    }

    /// Content root this index was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All sections in display order.
    pub fn sections(&self) -> &[Page] {
        &self.sections
    }

    /// Look up a section.
    pub fn section(&self, id: &str) -> Option<&Page> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Subsections of a section in display order (empty if unknown).
    pub fn subsections_of(&self, section_id: &str) -> &[Page] {
        self.subsections
            .get(section_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look up a subsection of a section.
    pub fn subsection(&self, section_id: &str, subsection_id: &str) -> Option<&Page> {
        self.subsections_of(section_id)
            .iter()
            .find(|s| s.id == subsection_id)
    }

    /// Look up a section (`subsection_id == None`) or a subsection.
    pub fn page(&self, section_id: &str, subsection_id: Option<&str>) -> Option<&Page> {
        match subsection_id {
            Some(sub) => self.subsection(section_id, sub),
            None => self.section(section_id),
        }
    }

    /// Find a page by bare id, as used by `[nav:]` link targets.
    ///
    /// Sections are checked first, then subsections in navigation order.
    pub fn find_page(&self, id: &str) -> Option<&Page> {
        self.section(id).or_else(|| {
            self.sections
                .iter()
                .flat_map(|s| self.subsections_of(&s.id))
                .find(|sub| sub.id == id)
        })
    }

    /// Drawer notes of a subsection, ordered (empty if none).
    pub fn drawer_notes_of(&self, section_id: &str, subsection_id: &str) -> &[DrawerNote] {
        self.notes
            .get(section_id)
            .and_then(|subs| subs.get(subsection_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look up a drawer note of a subsection.
    pub fn drawer_note(
        &self,
        section_id: &str,
        subsection_id: &str,
        note_id: &str,
    ) -> Option<&DrawerNote> {
        self.drawer_notes_of(section_id, subsection_id)
            .iter()
            .find(|n| n.id == note_id)
    }

    /// First section in display order.
    pub fn first_section(&self) -> Option<&Page> {
        self.sections.first()
    }

    /// Section shown for `/`: the configured default if it exists, else the
    /// first section.
    pub fn default_section(&self) -> Option<&Page> {
        self.default_section
            .as_deref()
            .and_then(|id| self.section(id))
            .or_else(|| self.first_section())
    }

    /// Every section and subsection, in navigation order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.sections
            .iter()
            .flat_map(|s| std::iter::once(s).chain(self.subsections_of(&s.id)))
    }

    /// Every drawer note, grouped by owning subsection.
    pub fn drawer_notes(&self) -> impl Iterator<Item = &DrawerNote> {
        self.notes.values().flat_map(|subs| subs.values()).flatten()
    }

    /// Subsections whose section has no page of its own.
    pub fn orphaned_subsections(&self) -> impl Iterator<Item = &Page> {
        self.subsections
            .iter()
            .filter(|(section_id, _)| self.section(section_id).is_none())
            .flat_map(|(_, subs)| subs.iter())
    }

    /// Categories in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Build the navigation tree.
    pub fn nav_tree(&self) -> NavTree {
        NavTree {
            sections: self
                .sections
                .iter()
                .map(|s| NavSection::from_pages(s, self.subsections_of(&s.id)))
                .collect(),
        }
    }

    /// Whether no sections were loaded.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of sections plus subsections.
    pub fn page_count(&self) -> usize {
        self.sections.len() + self.subsections.values().map(Vec::len).sum::<usize>()
    }

    /// Number of drawer notes.
    pub fn note_count(&self) -> usize {
        self.drawer_notes().count()
    }

    /// Fingerprint of the content directory at load time.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// When this snapshot was built.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
