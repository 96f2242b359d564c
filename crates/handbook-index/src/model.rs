//! Indexed content entries.

use std::path::{Path, PathBuf};

use handbook_content::markdown::{extract_first_paragraph, extract_headings, extract_title};
use handbook_content::{FrontmatterResult, Heading};
use handbook_core::prettify_id;
use serde::{Deserialize, Serialize};

use crate::category::{Category, ResolvedCategory};

/// Order given to entries that specify none.
pub const DEFAULT_ORDER: i64 = 999;

/// Order given to placeholder entries for files that failed to load.
pub const PLACEHOLDER_ORDER: i64 = 9999;

const SUMMARY_CHARS: usize = 160;

/// A section or subsection page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Folder (and file stem) name
    pub id: String,
    /// Parent section id; `None` for a section
    pub section_id: Option<String>,
    /// Display title
    pub title: String,
    /// Sort position among siblings
    pub order: i64,
    /// Category id
    pub category: String,
    /// Published (`true`) or beta (`false`)
    pub is_final: bool,
    /// Markdown body, frontmatter removed
    pub body: String,
    /// Level-two headings of the body
    pub headings: Vec<Heading>,
    /// First paragraph, as plain text
    pub summary: Option<String>,
    /// Source file
    pub path: PathBuf,
    /// Stands in for a file that could not be read
    pub placeholder: bool,
}

impl Page {
    /// Returns `true` for a top-level section.
    pub fn is_section(&self) -> bool {
        self.section_id.is_none()
    }

    /// Returns `true` if this page should carry a beta marker.
    pub fn is_beta(&self) -> bool {
        !self.is_final
    }

    /// Route path: `/section` or `/section/subsection`.
    pub fn route(&self) -> String {
        match &self.section_id {
            Some(section) => format!("/{section}/{}", self.id),
            None => format!("/{}", self.id),
        }
    }

    /// Whether `anchor` is one of this page's heading anchors.
    pub fn has_anchor(&self, anchor: &str) -> bool {
        self.headings.iter().any(|h| h.anchor == anchor)
    }
}

/// A drawer note belonging to one subsection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawerNote {
    /// File stem, unique within the owning subsection
    pub id: String,
    /// Section id
    pub section_id: String,
    /// Owning subsection id
    pub subsection_id: String,
    /// Display title
    pub title: String,
    /// Sort position among sibling notes
    pub order: i64,
    /// Category id
    pub category: String,
    /// Markdown body, frontmatter removed
    pub body: String,
    /// Source file
    pub path: PathBuf,
    /// Stands in for a file that could not be read
    pub placeholder: bool,
}

/// Metadata derived from one file's frontmatter and body.
#[derive(Debug, Clone)]
pub(crate) struct EntryMeta {
    pub title: String,
    pub order: i64,
    pub is_final: bool,
    pub category: Category,
}

impl EntryMeta {
    /// Title: frontmatter `title` → first level-one heading → prettified id.
    /// Order: frontmatter `order` → category default → [`DEFAULT_ORDER`].
    pub fn derive(id: &str, frontmatter: &FrontmatterResult<'_>, resolved: ResolvedCategory) -> Self {
        let title = frontmatter
            .get("title")
            .map(|v| v.to_string().trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| extract_title(frontmatter.body()))
            .unwrap_or_else(|| prettify_id(id));

        let order = frontmatter
            .get_i64("order")
            .or_else(|| resolved.default_entry_order())
            .unwrap_or(DEFAULT_ORDER);

        Self {
            title,
            order,
            is_final: frontmatter.get_bool("final").unwrap_or(true),
            category: resolved.category,
        }
    }

    pub fn into_page(self, id: &str, section_id: Option<&str>, body: &str, path: &Path) -> Page {
        Page {
            id: id.to_string(),
            section_id: section_id.map(str::to_string),
            title: self.title,
            order: self.order,
            category: self.category.id,
            is_final: self.is_final,
            body: body.to_string(),
            headings: extract_headings(body, 2),
            summary: extract_first_paragraph(body, SUMMARY_CHARS),
            path: path.to_path_buf(),
            placeholder: false,
        }
    }
}

/// Markdown body describing a load failure.
pub(crate) fn placeholder_body(path: &Path, message: &str) -> String {
    format!(
        "# Error Loading File\n\nThere was an error loading this file:\n\n```\n{message}\n```\n\nPath: {}\n",
        path.display()
    )
}

/// A page standing in for a file that could not be read.
pub(crate) fn placeholder_page(id: &str, section_id: Option<&str>, path: &Path, message: &str) -> Page {
    let body = placeholder_body(path, message);
    Page {
        id: id.to_string(),
        section_id: section_id.map(str::to_string),
        title: format!("Error: {id}"),
        order: PLACEHOLDER_ORDER,
        category: Category::errors().id,
        is_final: true,
        headings: extract_headings(&body, 2),
        summary: None,
        body,
        path: path.to_path_buf(),
        placeholder: true,
    }
}

/// Sort pages ascending by order; ties keep their current relative order.
pub fn sort_pages(pages: &mut [Page]) {
    pages.sort_by_key(|p| p.order);
}

/// Sort drawer notes by order, then id.
pub fn sort_notes(notes: &mut [DrawerNote]) {
    notes.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
}
