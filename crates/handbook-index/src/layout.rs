//! Directory layout classification.
//!
//! Content follows a fixed convention relative to the content root:
//!
//! | Path                          | Role                       |
//! |-------------------------------|----------------------------|
//! | `S/S.md`                      | Section `S`                |
//! | `S/B/B.md`                    | Subsection `B` of `S`      |
//! | `S/B/drawer/N.md`             | Drawer note `N` of `S/B`   |
//!
//! Anything else is ignored, as is everything under an excluded top-level
//! directory.

use std::path::{Component, Path};

use handbook_core::id_from_path;

/// Name of the per-subsection directory holding drawer notes.
pub const DRAWER_DIR: &str = "drawer";

/// What a markdown file is, according to where it sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRole {
    /// `S/S.md`
    Section {
        /// Section id
        section: String,
    },
    /// `S/B/B.md`
    Subsection {
        /// Parent section id
        section: String,
        /// Subsection id
        subsection: String,
    },
    /// `S/B/drawer/N.md`
    DrawerNote {
        /// Section id
        section: String,
        /// Owning subsection id
        subsection: String,
        /// Note id
        note: String,
    },
    /// Not part of the page hierarchy.
    Ignored(IgnoreReason),
}

/// Why a file was not indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Under an excluded top-level directory.
    Excluded,
    /// Does not match any layout rule.
    Unrecognized,
    /// Not under the content root.
    OutsideRoot,
}

/// Classify `path` relative to `root`.
///
/// ```rust
/// use std::path::Path;
/// use handbook_index::layout::{classify, FileRole};
///
/// let role = classify(
///     Path::new("/content"),
///     Path::new("/content/privacy/asr-privacy/asr-privacy.md"),
///     &[],
/// );
/// assert_eq!(
///     role,
///     FileRole::Subsection {
///         section: "privacy".into(),
///         subsection: "asr-privacy".into()
///     }
/// );
/// ```
pub fn classify(root: &Path, path: &Path, excluded_dirs: &[String]) -> FileRole {
    let Ok(rel) = path.strip_prefix(root) else {
        return FileRole::Ignored(IgnoreReason::OutsideRoot);
    };

    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(s) => parts.push(s),
                None => return FileRole::Ignored(IgnoreReason::Unrecognized),
            },
            _ => return FileRole::Ignored(IgnoreReason::OutsideRoot),
        }
    }

    if let Some(top) = parts.first() {
        if excluded_dirs.iter().any(|d| d == top) {
            return FileRole::Ignored(IgnoreReason::Excluded);
        }
    }

    let Some(stem) = id_from_path(rel) else {
        return FileRole::Ignored(IgnoreReason::Unrecognized);
    };

    match parts.as_slice() {
        [section, _] if *section == stem => FileRole::Section {
            section: stem,
        },
        [section, subsection, _] if *subsection == stem && *subsection != DRAWER_DIR => {
            FileRole::Subsection {
                section: section.to_string(),
                subsection: stem,
            }
        }
        [section, subsection, drawer, _] if *drawer == DRAWER_DIR && *subsection != DRAWER_DIR => {
            FileRole::DrawerNote {
                section: section.to_string(),
                subsection: subsection.to_string(),
                note: stem,
            }
        }
        _ => FileRole::Ignored(IgnoreReason::Unrecognized),
    }
}
