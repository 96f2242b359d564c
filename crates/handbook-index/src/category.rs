//! Category resolution.
//!
//! Every section, subsection and drawer note belongs to exactly one
//! category. Resolution tries, in order:
//!
//! 1. the `category` frontmatter key
//! 2. a declared mapping from content id to category (configuration)
//! 3. a filename-substring heuristic, only when enabled
//! 4. the catch-all [`DEFAULT_CATEGORY`]

use std::collections::BTreeMap;

use handbook_content::FrontmatterResult;
use handbook_core::{normalize_id, prettify_id};
use serde::{Deserialize, Serialize};

/// Category order for anything missing from [`CATEGORY_PRIORITIES`].
pub const DEFAULT_CATEGORY_ORDER: i64 = 100;

/// Category every unmatched entry falls into.
pub const DEFAULT_CATEGORY: &str = "algorithmic-fairness";

/// Category of placeholder entries for files that failed to load.
pub const ERROR_CATEGORY: &str = "errors";

/// Known categories and their navigation order (lower first).
pub const CATEGORY_PRIORITIES: &[(&str, i64)] = &[
    ("introduction", 1),
    ("getting-started", 2),
    ("basics", 3),
    ("core-concepts", 4),
    ("algorithmic-fairness", 5),
    ("algorithmic-justice", 6),
    ("fairness-metrics", 7),
    ("applications", 8),
    ("advanced", 9),
    ("case-studies", 10),
    ("appendix", 11),
];

/// Filename substrings mapped to categories, checked in order.
const HEURISTICS: &[(&[&str], &str)] = &[
    (&["fairness-metric", "equalized-odds"], "fairness-metrics"),
    (&["justice", "participatory", "accountability"], "algorithmic-justice"),
    (&["high-impact", "credit", "child"], "applications"),
];

/// Priority-table order for a category id.
pub fn category_priority(id: &str) -> i64 {
    CATEGORY_PRIORITIES
        .iter()
        .find(|(name, _)| *name == id)
        .map(|(_, order)| *order)
        .unwrap_or(DEFAULT_CATEGORY_ORDER)
}

/// A navigation grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Kebab-case identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Sort order (lower first)
    pub order: i64,
}

impl Category {
    /// A category with its display name and order taken from the defaults.
    pub fn known(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: prettify_id(id),
            order: category_priority(id),
        }
    }

    /// The category placeholder entries belong to.
    pub fn errors() -> Self {
        Self {
            id: ERROR_CATEGORY.to_string(),
            name: "Errors".to_string(),
            order: 9999,
        }
    }
}

/// Where a resolved category came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySource {
    /// `category` frontmatter key
    Frontmatter,
    /// Declared content-id mapping
    Declared,
    /// Filename heuristic
    Inferred,
    /// Catch-all default
    Default,
}

/// Outcome of category resolution for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCategory {
    /// The category
    pub category: Category,
    /// How it was chosen
    pub source: CategorySource,
}

impl ResolvedCategory {
    /// Entry order to use when frontmatter gives none.
    ///
    /// An explicit frontmatter category puts the entry first within it.
    pub fn default_entry_order(&self) -> Option<i64> {
        match self.source {
            CategorySource::Frontmatter => Some(1),
            _ => None,
        }
    }
}

/// Resolves categories for content entries.
#[derive(Debug, Clone, Default)]
pub struct CategoryResolver {
    declared: BTreeMap<String, String>,
    infer: bool,
}

impl CategoryResolver {
    /// A resolver with no declared mapping and the heuristic disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare content-id → category mappings.
    pub fn with_mapping(mut self, mapping: BTreeMap<String, String>) -> Self {
        self.declared = mapping;
        self
    }

    /// Enable or disable the filename-substring heuristic.
    pub fn with_inference(mut self, enabled: bool) -> Self {
        self.infer = enabled;
        self
    }

    /// Resolve the category for the entry `id` with its frontmatter.
    pub fn resolve(&self, id: &str, frontmatter: &FrontmatterResult<'_>) -> ResolvedCategory {
        if let Some(raw) = frontmatter.get_str("category") {
            let cat_id = normalize_id(raw);
            if !cat_id.is_empty() {
                let name = frontmatter
                    .get_str("categoryName")
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| prettify_id(&cat_id));
                let order = frontmatter
                    .get_i64("categoryOrder")
                    .unwrap_or_else(|| category_priority(&cat_id));

                return ResolvedCategory {
                    category: Category {
                        id: cat_id,
                        name,
                        order,
                    },
                    source: CategorySource::Frontmatter,
                };
            }
        }

        if let Some(declared) = self.declared.get(id) {
            return ResolvedCategory {
                category: Category::known(&normalize_id(declared)),
                source: CategorySource::Declared,
            };
        }

        if self.infer {
            if let Some(inferred) = infer_from_id(id) {
                log::debug!("Inferred category '{inferred}' for '{id}'");
                return ResolvedCategory {
                    category: Category::known(inferred),
                    source: CategorySource::Inferred,
                };
            }
        }

        ResolvedCategory {
            category: Category::known(DEFAULT_CATEGORY),
            source: CategorySource::Default,
        }
    }
}

fn infer_from_id(id: &str) -> Option<&'static str> {
    HEURISTICS
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| id.contains(n)))
        .map(|(_, category)| *category)
}
