//! Markdown parsing, frontmatter extraction, and custom link handling for
//! handbook content.
//!
//! This crate knows nothing about the directory layout or the page
//! hierarchy; it turns one markdown file's text into structured pieces that
//! the index and the renderer share.
//!
//! # Modules
//!
//! - [`markdown`]: Markdown parsing and frontmatter extraction
//!   - [`markdown::frontmatter`]: flat `key: value` frontmatter
//!   - [`markdown::links`]: typed IR for custom inline links
//!   - [`markdown::parser`]: Titles, headings, paragraphs
//!
//! # Example
//!
//! ```rust
//! use handbook_content::markdown::{extract_frontmatter, extract_title};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct PageMeta {
//!     order: Option<i64>,
//! }
//!
//! let content = "---\norder: 2\n---\n# Hello\n\nBody";
//! let result = extract_frontmatter(content);
//! let meta: PageMeta = result.deserialize().unwrap().unwrap();
//! assert_eq!(meta.order, Some(2));
//! assert_eq!(extract_title(result.body()).as_deref(), Some("Hello"));
//! ```

pub mod markdown;

// Re-export commonly used types
pub use markdown::{
    extract_frontmatter, extract_headings, extract_title, parse_links, strip_frontmatter,
    AnnotatedMarkdown, CustomLink, FrontmatterResult, FrontmatterValue, Heading, LinkKind,
    Segment,
};

// Re-export for renderers that walk the event stream themselves
pub use pulldown_cmark;
