//! Markdown structure parsing utilities.
//!
//! This module extracts structural elements from markdown bodies using
//! `pulldown-cmark`:
//!
//! - Page titles (first level-one heading)
//! - Headings of a given level, with their anchors
//! - First paragraph, as a plain-text summary
//!
//! Bodies go through the custom-link pre-pass first, so heading text reads
//! the same here as it does in the renderer: a `[nav:Label](id)` inside a
//! heading contributes `Label`. [`heading_text`] is the one place heading
//! text is assembled, and the renderer calls it too.
//!
//! # Example
//!
//! ```rust
//! use handbook_content::markdown::parser::{extract_headings, extract_title};
//!
//! let body = "# Group Fairness\n\n## What Is It?\n\nText.\n\n## Metrics\n";
//!
//! assert_eq!(extract_title(body).as_deref(), Some("Group Fairness"));
//!
//! let headings = extract_headings(body, 2);
//! assert_eq!(headings[0].text, "What Is It?");
//! assert_eq!(headings[0].anchor, "what-is-it");
//! assert_eq!(headings[1].anchor, "metrics");
//! ```

use handbook_core::heading_anchor;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, TextMergeStream};
use serde::{Deserialize, Serialize};

use super::links::AnnotatedMarkdown;

/// Parser options shared by every consumer of markdown bodies.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Parse an annotated body into a merged event stream.
pub fn events<'t>(annotated: &'t AnnotatedMarkdown<'_>) -> TextMergeStream<'t, Parser<'t>> {
    TextMergeStream::new(Parser::new_ext(annotated.text(), markdown_options()))
}

/// A heading found in a markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,
    /// Visible text with inline formatting stripped
    pub text: String,
    /// Anchor computed from `text`
    pub anchor: String,
}

impl Heading {
    /// Build a heading, computing its anchor.
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        let text = text.into();
        let anchor = heading_anchor(&text);
        Self {
            level,
            text,
            anchor,
        }
    }
}

/// Assemble the visible text of a heading from its inner events.
///
/// Text and inline code are concatenated, breaks become spaces, custom
/// link markers resolve to their labels, and the result is trimmed.
pub fn heading_text<'e, 's: 'e, I>(inner: I, annotated: &AnnotatedMarkdown<'_>) -> String
where
    I: IntoIterator<Item = &'e Event<'s>>,
{
    let mut text = String::new();

    for event in inner {
        match event {
            Event::Text(t) => text.push_str(&annotated.visible_text(t)),
            Event::Code(t) => text.push_str(&annotated.restore(t)),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }

    text.trim().to_string()
}

/// Extract all headings from a markdown body.
pub fn extract_all_headings(body: &str) -> Vec<Heading> {
    let annotated = AnnotatedMarkdown::new(body);
    let mut headings = Vec::new();
    let mut current: Option<(HeadingLevel, Vec<Event<'_>>)> = None;

    for event in events(&annotated) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level, Vec::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, inner)) = current.take() {
                    let text = heading_text(&inner, &annotated);
                    if !text.is_empty() {
                        headings.push(Heading::new(level as u8, text));
                    }
                }
            }
            other => {
                if let Some((_, inner)) = current.as_mut() {
                    inner.push(other);
                }
            }
        }
    }

    headings
}

/// Extract headings of one level from a markdown body.
///
/// Headings with no visible text are skipped.
pub fn extract_headings(body: &str, level: u8) -> Vec<Heading> {
    extract_all_headings(body)
        .into_iter()
        .filter(|h| h.level == level)
        .collect()
}

/// Extract the page title: the text of the first level-one heading.
pub fn extract_title(body: &str) -> Option<String> {
    extract_all_headings(body)
        .into_iter()
        .find(|h| h.level == 1)
        .map(|h| h.text)
}

/// Extract the first paragraph as plain text.
///
/// Skips headings. The result is truncated at a word boundary to
/// `max_chars` bytes with "..." appended when longer.
///
/// ```rust
/// use handbook_content::markdown::parser::extract_first_paragraph;
///
/// let body = "# Title\n\nThis is a **bold** [nav:intro](intro).\n\nMore.";
/// assert_eq!(
///     extract_first_paragraph(body, 100).as_deref(),
///     Some("This is a bold intro.")
/// );
/// ```
pub fn extract_first_paragraph(body: &str, max_chars: usize) -> Option<String> {
    let annotated = AnnotatedMarkdown::new(body);
    let mut in_paragraph = false;
    let mut in_heading = false;
    let mut text = String::new();

    for event in events(&annotated) {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => in_heading = false,
            Event::Start(Tag::Paragraph) if !in_heading => {
                in_paragraph = true;
                text.clear();
            }
            Event::End(TagEnd::Paragraph) if in_paragraph => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    return Some(truncate_text(trimmed, max_chars));
                }
                in_paragraph = false;
            }
            Event::Text(t) if in_paragraph => text.push_str(&annotated.visible_text(&t)),
            Event::Code(t) if in_paragraph => text.push_str(&annotated.restore(&t)),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }

    None
}

fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.len() <= max_chars {
        return text.to_string();
    }

    let mut cut = max_chars;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let truncate_at = text[..cut]
        .rfind(char::is_whitespace)
        .unwrap_or(cut);

    format!("{}...", text[..truncate_at].trim())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // extract_title tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_title_from_first_h1() {
        let body = "Intro text\n\n## Not This\n\n# Main Title\n\n# Second";
        assert_eq!(extract_title(body).as_deref(), Some("Main Title"));
    }

    #[test]
    fn test_title_strips_formatting() {
        let body = "# Title with **bold** and `code`\n";
        assert_eq!(
            extract_title(body).as_deref(),
            Some("Title with bold and code")
        );
    }

    #[test]
    fn test_title_setext() {
        let body = "Setext Title\n============\n\nBody";
        assert_eq!(extract_title(body).as_deref(), Some("Setext Title"));
    }

    #[test]
    fn test_title_absent() {
        assert_eq!(extract_title("## Only level two\n\ntext"), None);
        assert_eq!(extract_title(""), None);
    }

    #[test]
    fn test_title_with_custom_link_uses_label() {
        let body = "# About [nav:Privacy](privacy)\n";
        assert_eq!(extract_title(body).as_deref(), Some("About Privacy"));
    }

    // ------------------------------------------------------------------------
    // extract_headings tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_level_two_headings_with_anchors() {
        let body = "# T\n\n## What Is   Bias?\n\n### Deep\n\n## Pre- and Post-processing\n";
        let headings = extract_headings(body, 2);

        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text, "What Is   Bias?");
        assert_eq!(headings[0].anchor, "what-is-bias");
        assert_eq!(headings[1].anchor, "pre-and-post-processing");
        assert!(headings.iter().all(|h| h.level == 2));
    }

    #[test]
    fn test_headings_in_code_blocks_ignored() {
        let body = "```\n## not a heading\n```\n\n## Real\n";
        let headings = extract_headings(body, 2);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Real");
    }

    #[test]
    fn test_empty_heading_skipped() {
        let body = "##\n\n## Named\n";
        let headings = extract_headings(body, 2);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].anchor, "named");
    }

    #[test]
    fn test_heading_code_span_keeps_custom_syntax() {
        let body = "## Use `[nav:X](y)` links\n";
        let headings = extract_headings(body, 2);
        assert_eq!(headings[0].text, "Use [nav:X](y) links");
    }

    #[test]
    fn test_heading_new_computes_anchor() {
        let heading = Heading::new(2, "Equalized Odds (EO)");
        assert_eq!(heading.anchor, "equalized-odds-eo");
    }

    // ------------------------------------------------------------------------
    // extract_first_paragraph tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_paragraph_after_heading() {
        let body = "# Title\n\nThis is the first paragraph.\n\nSecond paragraph.";
        assert_eq!(
            extract_first_paragraph(body, 100).as_deref(),
            Some("This is the first paragraph.")
        );
    }

    #[test]
    fn test_paragraph_truncation() {
        let body = "This is a longer paragraph that should be truncated.";
        let paragraph = extract_first_paragraph(body, 20).unwrap();
        assert!(paragraph.len() <= 23);
        assert!(paragraph.ends_with("..."));
    }

    #[test]
    fn test_paragraph_truncation_respects_char_boundaries() {
        let body = "ééééééééééééééééééééééé";
        let paragraph = extract_first_paragraph(body, 5).unwrap();
        assert!(paragraph.ends_with("..."));
    }

    #[test]
    fn test_no_paragraph() {
        assert_eq!(extract_first_paragraph("# Just a Heading", 100), None);
        assert_eq!(extract_first_paragraph("", 100), None);
    }
}
