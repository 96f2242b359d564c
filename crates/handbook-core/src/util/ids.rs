//! Identifier, title, and anchor utilities.
//!
//! Content identifiers come straight from folder and file names, so they are
//! used verbatim for lookups. Category identifiers coming from frontmatter
//! are free text and go through [`normalize_id`]. [`heading_anchor`] is the
//! only anchor function in the workspace: the navigation tree and the
//! renderer both call it, so the anchors they produce cannot drift apart.

use std::path::Path;

/// Normalize an identifier to lowercase kebab-case.
///
/// Performs the following transformations:
/// 1. Trims leading/trailing whitespace
/// 2. Converts to lowercase
/// 3. Replaces underscores with hyphens
/// 4. Collapses multiple whitespace into single hyphens
///
/// # Examples
///
/// ```
/// use handbook_core::util::ids::normalize_id;
///
/// assert_eq!(normalize_id("Case Studies"), "case-studies");
/// assert_eq!(normalize_id("core_concepts"), "core-concepts");
/// assert_eq!(normalize_id("  Algorithmic   Justice  "), "algorithmic-justice");
/// ```
pub fn normalize_id(id: &str) -> String {
    id.trim()
        .to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join("-")
}

/// Return a file path's stem as an identifier, verbatim.
///
/// Returns `None` if the path has no UTF-8 file stem.
///
/// ```
/// use std::path::Path;
/// use handbook_core::util::ids::id_from_path;
///
/// assert_eq!(
///     id_from_path(Path::new("privacy/asr-privacy/drawer/wikimedia-voice.md")),
///     Some("wikimedia-voice".to_string())
/// );
/// assert_eq!(id_from_path(Path::new("/")), None);
/// ```
pub fn id_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(String::from)
}

/// Compute the anchor for a heading's text.
///
/// Lowercases, drops every character that is not an ASCII word character,
/// whitespace, or `-`, turns whitespace runs into `-`, then collapses `-`
/// runs. Surrounding whitespace is not trimmed.
///
/// ```
/// use handbook_core::util::ids::heading_anchor;
///
/// assert_eq!(heading_anchor("What Is Group Fairness?"), "what-is-group-fairness");
/// assert_eq!(heading_anchor("Pre-   and Post-processing"), "pre-and-post-processing");
/// assert_eq!(heading_anchor("Equalized Odds (EO)"), "equalized-odds-eo");
/// ```
pub fn heading_anchor(text: &str) -> String {
    let mut anchor = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                push_hyphen(&mut anchor);
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;

        if c == '-' {
            push_hyphen(&mut anchor);
        } else if c.is_ascii_alphanumeric() || c == '_' {
            anchor.push(c.to_ascii_lowercase());
        }
    }

    anchor
}

fn push_hyphen(anchor: &mut String) {
    if !anchor.ends_with('-') {
        anchor.push('-');
    }
}

/// Turn a kebab-case identifier into a display title.
///
/// Each `-`-separated word gets its first character uppercased; an empty
/// identifier becomes `"Untitled"`.
///
/// ```
/// use handbook_core::util::ids::prettify_id;
///
/// assert_eq!(prettify_id("group-fairness"), "Group Fairness");
/// assert_eq!(prettify_id(""), "Untitled");
/// ```
pub fn prettify_id(id: &str) -> String {
    if id.is_empty() {
        return "Untitled".to_string();
    }

    id.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // normalize_id tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_normalize_id_simple() {
        assert_eq!(normalize_id("appendix"), "appendix");
    }

    #[test]
    fn test_normalize_id_with_spaces() {
        assert_eq!(normalize_id("Getting Started"), "getting-started");
    }

    #[test]
    fn test_normalize_id_with_underscores() {
        assert_eq!(normalize_id("fairness_metrics"), "fairness-metrics");
    }

    #[test]
    fn test_normalize_id_empty() {
        assert_eq!(normalize_id(""), "");
        assert_eq!(normalize_id("   "), "");
    }

    // -------------------------------------------------------------------------
    // id_from_path tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_id_from_path_keeps_case() {
        let path = Path::new("privacy/valueOfPrivacy/valueOfPrivacy.md");
        assert_eq!(id_from_path(path), Some("valueOfPrivacy".to_string()));
    }

    #[test]
    fn test_id_from_path_no_extension() {
        assert_eq!(
            id_from_path(Path::new("content/README")),
            Some("README".to_string())
        );
    }

    // -------------------------------------------------------------------------
    // heading_anchor tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_anchor_lowercases() {
        assert_eq!(heading_anchor("Selection Bias"), "selection-bias");
    }

    #[test]
    fn test_anchor_strips_punctuation() {
        assert_eq!(heading_anchor("Why? Because: reasons!"), "why-because-reasons");
        assert_eq!(heading_anchor("Shapley & neutrality"), "shapley-neutrality");
    }

    #[test]
    fn test_anchor_collapses_spaces() {
        assert_eq!(heading_anchor("many    spaces\there"), "many-spaces-here");
    }

    #[test]
    fn test_anchor_collapses_hyphens() {
        assert_eq!(heading_anchor("a -- b"), "a-b");
        assert_eq!(heading_anchor("a---b"), "a-b");
    }

    #[test]
    fn test_anchor_keeps_underscores_and_digits() {
        assert_eq!(heading_anchor("Case Study 2_a"), "case-study-2_a");
    }

    #[test]
    fn test_anchor_drops_non_ascii_word_chars() {
        assert_eq!(heading_anchor("Café Privacy"), "caf-privacy");
    }

    #[test]
    fn test_anchor_does_not_trim() {
        assert_eq!(heading_anchor(" padded "), "-padded-");
    }

    #[test]
    fn test_anchor_is_deterministic() {
        let text = "Mixed CASE, punctuation!!  and   gaps";
        assert_eq!(heading_anchor(text), heading_anchor(text));
        assert_eq!(heading_anchor(text), "mixed-case-punctuation-and-gaps");
    }

    #[test]
    fn test_anchor_empty() {
        assert_eq!(heading_anchor(""), "");
        assert_eq!(heading_anchor("???"), "");
    }

    // -------------------------------------------------------------------------
    // prettify_id tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_prettify_multi_word() {
        assert_eq!(prettify_id("measurement-bias-case-study"), "Measurement Bias Case Study");
    }

    #[test]
    fn test_prettify_keeps_inner_case() {
        assert_eq!(prettify_id("valueOfPrivacy"), "ValueOfPrivacy");
    }

    #[test]
    fn test_prettify_double_hyphen() {
        assert_eq!(prettify_id("a--b"), "A  B");
    }
}
