//! Custom inline link syntax.
//!
//! Markdown bodies may contain two link forms on top of standard markdown:
//!
//! - `[nav:Label](section-or-subsection-id)` moves to another page
//! - `[drawer:Label](note-id)` opens a drawer note of the current subsection
//!   (`[sidebar:Label](note-id)` is accepted as an alias)
//!
//! [`parse_links`] turns text into a sequence of [`Segment`]s. Every segment
//! keeps the exact source text it came from, so joining the sources always
//! reproduces the input. Instances with an empty label or target are kept as
//! [`Segment::Malformed`] rather than turned into dead controls.
//!
//! Labels and targets cannot contain brackets, parentheses or backticks. A
//! backtick ends the candidate, so a code span that opens inside a label
//! keeps its code formatting instead of turning into a control.
//!
//! [`AnnotatedMarkdown`] is the pre-pass used before handing a body to
//! `pulldown-cmark`: each custom link is swapped for an opaque marker that
//! markdown parsing leaves alone, and the marker is resolved back to its
//! segment afterwards.
//!
//! ```rust
//! use handbook_content::markdown::links::{parse_links, LinkKind, Segment};
//!
//! let segments = parse_links("See [nav:Privacy](privacy) first.");
//! assert_eq!(segments.len(), 3);
//! match &segments[1] {
//!     Segment::Link(link) => {
//!         assert_eq!(link.kind, LinkKind::Nav);
//!         assert_eq!(link.label, "Privacy");
//!         assert_eq!(link.target, "privacy");
//!     }
//!     other => panic!("unexpected segment: {other:?}"),
//! }
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static CUSTOM_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(nav|drawer|sidebar):([^\[\]`]*)\]\(([^()`]*)\)")
        .expect("custom link pattern is valid")
});

const MARKER_OPEN: char = '\u{E000}';
const MARKER_CLOSE: char = '\u{E001}';

// ============================================================================
// IR types
// ============================================================================

/// What a custom link does when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Navigate to a section or subsection.
    Nav,
    /// Open a drawer note of the current subsection.
    Drawer,
}

impl LinkKind {
    /// Map a syntax prefix to a kind; `sidebar` is an alias for `drawer`.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "nav" => Some(Self::Nav),
            "drawer" | "sidebar" => Some(Self::Drawer),
            _ => None,
        }
    }

    /// The canonical name, as used in `data-action` attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nav => "nav",
            Self::Drawer => "drawer",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A well-formed custom link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomLink<'a> {
    /// Nav or drawer
    pub kind: LinkKind,
    /// Visible label, trimmed
    pub label: &'a str,
    /// Target id, trimmed
    pub target: &'a str,
    /// The exact text this link was parsed from
    pub source: &'a str,
}

/// One piece of scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text (which may still contain ordinary markdown).
    Text(&'a str),
    /// A well-formed custom link.
    Link(CustomLink<'a>),
    /// Custom link syntax with an empty label or target, kept verbatim.
    Malformed(&'a str),
}

impl<'a> Segment<'a> {
    /// The exact source text of this segment.
    pub fn source(&self) -> &'a str {
        match self {
            Segment::Text(s) | Segment::Malformed(s) => s,
            Segment::Link(link) => link.source,
        }
    }
}

// ============================================================================
// Scanning
// ============================================================================

/// Split text into plain text, custom links and malformed custom links.
///
/// A label or target that is empty after trimming makes the instance
/// malformed, as does a target containing whitespace.
pub fn parse_links(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in CUSTOM_LINK.captures_iter(text) {
        let (Some(whole), Some(prefix), Some(label), Some(target)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };

        if whole.start() > last {
            segments.push(Segment::Text(&text[last..whole.start()]));
        }
        last = whole.end();

        let source = whole.as_str();
        let label = label.as_str().trim();
        let target = target.as_str().trim();

        let kind = match LinkKind::from_prefix(prefix.as_str()) {
            Some(kind) if !label.is_empty() && is_valid_target(target) => kind,
            _ => {
                log::debug!("Malformed custom link: {source}");
                segments.push(Segment::Malformed(source));
                continue;
            }
        };

        segments.push(Segment::Link(CustomLink {
            kind,
            label,
            target,
            source,
        }));
    }

    if last < text.len() {
        segments.push(Segment::Text(&text[last..]));
    }

    segments
}

fn is_valid_target(target: &str) -> bool {
    !target.is_empty() && !target.chars().any(char::is_whitespace)
}

// ============================================================================
// Pre-pass for markdown rendering
// ============================================================================

/// A piece of text after marker resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece<'t, 'a> {
    /// Text that carried no marker.
    Text(&'t str),
    /// A custom link or malformed instance that a marker stood for.
    Segment(&'t Segment<'a>),
}

/// Markdown with custom link syntax replaced by opaque markers.
///
/// The markers contain no characters that markdown treats specially, so
/// they pass through parsing as ordinary text (including inside code spans,
/// code blocks and raw HTML, where callers restore the original source).
#[derive(Debug, Clone)]
pub struct AnnotatedMarkdown<'a> {
    text: String,
    segments: Vec<Segment<'a>>,
}

impl<'a> AnnotatedMarkdown<'a> {
    /// Run the pre-pass over a markdown body.
    pub fn new(body: &'a str) -> Self {
        let mut text = String::with_capacity(body.len());
        let mut segments = Vec::new();

        for segment in parse_links(body) {
            match segment {
                Segment::Text(s) => text.push_str(s),
                other => {
                    text.push(MARKER_OPEN);
                    text.push_str(&segments.len().to_string());
                    text.push(MARKER_CLOSE);
                    segments.push(other);
                }
            }
        }

        Self { text, segments }
    }

    /// The markdown to hand to the parser.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The custom link and malformed segments, in source order.
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// The well-formed links, in source order.
    pub fn links(&self) -> impl Iterator<Item = &CustomLink<'a>> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Link(link) => Some(link),
            _ => None,
        })
    }

    /// Split parser output text into plain pieces and resolved segments.
    pub fn split<'t>(&'t self, text: &'t str) -> Vec<Piece<'t, 'a>> {
        let mut pieces = Vec::new();
        let mut rest = text;

        while let Some((before, segment, after)) = self.next_marker(rest) {
            if !before.is_empty() {
                pieces.push(Piece::Text(before));
            }
            pieces.push(Piece::Segment(segment));
            rest = after;
        }

        if !rest.is_empty() {
            pieces.push(Piece::Text(rest));
        }

        pieces
    }

    /// Replace every marker in `text` with the source it stood for.
    pub fn restore<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if !text.contains(MARKER_OPEN) {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len());
        for piece in self.split(text) {
            match piece {
                Piece::Text(s) => out.push_str(s),
                Piece::Segment(segment) => out.push_str(segment.source()),
            }
        }
        Cow::Owned(out)
    }

    /// Replace every marker with the text a reader sees: a link's label, or
    /// a malformed instance verbatim.
    pub fn visible_text<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if !text.contains(MARKER_OPEN) {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len());
        for piece in self.split(text) {
            match piece {
                Piece::Text(s) => out.push_str(s),
                Piece::Segment(Segment::Link(link)) => out.push_str(link.label),
                Piece::Segment(segment) => out.push_str(segment.source()),
            }
        }
        Cow::Owned(out)
    }

    fn next_marker<'t>(&'t self, text: &'t str) -> Option<(&'t str, &'t Segment<'a>, &'t str)> {
        let mut search_from = 0;
        loop {
            let open = search_from + text[search_from..].find(MARKER_OPEN)?;
            let digits_start = open + MARKER_OPEN.len_utf8();
            let close = digits_start + text[digits_start..].find(MARKER_CLOSE)?;

            let found = text[digits_start..close]
                .parse::<usize>()
                .ok()
                .and_then(|i| self.segments.get(i));

            match found {
                Some(segment) => {
                    return Some((
                        &text[..open],
                        segment,
                        &text[close + MARKER_CLOSE.len_utf8()..],
                    ));
                }
                // Not one of ours; keep it as text and look further on.
                None => search_from = digits_start,
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
