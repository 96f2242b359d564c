//! Navigation tree.
//!
//! Section → subsections (with beta flag) → level-two heading anchors for
//! each page. Anchors come from the headings stored on each [`Page`], which
//! the renderer derives the same way, so sidebar links and rendered `id`
//! attributes agree.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::model::Page;

/// An in-page anchor entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavAnchor {
    /// Heading text
    pub title: String,
    /// Heading anchor
    pub anchor: String,
}

/// A subsection entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSubsection {
    /// Subsection id
    pub id: String,
    /// Display title
    pub title: String,
    /// Route path
    pub route: String,
    /// Not yet final
    pub beta: bool,
    /// Level-two headings
    pub anchors: Vec<NavAnchor>,
}

/// A section entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSection {
    /// Section id
    pub id: String,
    /// Display title
    pub title: String,
    /// Route path
    pub route: String,
    /// Category id
    pub category: String,
    /// Not yet final
    pub beta: bool,
    /// Level-two headings
    pub anchors: Vec<NavAnchor>,
    /// Subsections, in display order
    pub subsections: Vec<NavSubsection>,
}

/// Sections grouped under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavGroup {
    /// The category
    pub category: Category,
    /// Sections in display order
    pub sections: Vec<NavSection>,
}

/// The complete navigation tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTree {
    /// Sections in display order
    pub sections: Vec<NavSection>,
}

fn anchors(page: &Page) -> Vec<NavAnchor> {
    page.headings
        .iter()
        .map(|h| NavAnchor {
            title: h.text.clone(),
            anchor: h.anchor.clone(),
        })
        .collect()
}

fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl NavSection {
    pub(crate) fn from_pages(section: &Page, subsections: &[Page]) -> Self {
        Self {
            id: section.id.clone(),
            title: section.title.clone(),
            route: section.route(),
            category: section.category.clone(),
            beta: section.is_beta(),
            anchors: anchors(section),
            subsections: subsections
                .iter()
                .map(|sub| NavSubsection {
                    id: sub.id.clone(),
                    title: sub.title.clone(),
                    route: sub.route(),
                    beta: sub.is_beta(),
                    anchors: anchors(sub),
                })
                .collect(),
        }
    }
}

impl NavTree {
    /// Find a section entry.
    pub fn section(&self, id: &str) -> Option<&NavSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Group sections by category, in category order.
    ///
    /// Sections keep their relative order inside each group. Categories with
    /// no sections are omitted.
    pub fn grouped(&self, categories: &[Category]) -> Vec<NavGroup> {
        let mut groups: Vec<NavGroup> = categories
            .iter()
            .map(|category| NavGroup {
                category: category.clone(),
                sections: self
                    .sections
                    .iter()
                    .filter(|s| s.category == category.id)
                    .cloned()
                    .collect(),
            })
            .filter(|g| !g.sections.is_empty())
            .collect();

        groups.sort_by_key(|g| g.category.order);
        groups
    }

    /// Sections whose title and category id contain `query`.
    ///
    /// Matching ignores case and whitespace on both sides, so `"Fair Ness"`
    /// matches "Fairness" and `"Basics"` matches any section in `basics`.
    /// A blank query keeps every section. Combined with
    /// [`grouped`](Self::grouped), categories left empty disappear.
    pub fn filter(&self, query: &str) -> NavTree {
        let needle = compact(query);
        if needle.is_empty() {
            return self.clone();
        }

        NavTree {
            sections: self
                .sections
                .iter()
                .filter(|s| compact(&format!("{}{}", s.title, s.category)).contains(&needle))
                .cloned()
                .collect(),
        }
    }

    /// Whether the tree has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
