//! Markdown parsing, frontmatter extraction, and custom link scanning.
//!
//! - [`frontmatter`]: `key: value` frontmatter extraction with type coercion
//! - [`links`]: `[nav:]`, `[drawer:]` and `[sidebar:]` link scanning
//! - [`parser`]: Markdown structure parsing (titles, headings, paragraphs)

pub mod frontmatter;
pub mod links;
pub mod parser;

// Re-export key types and functions
pub use frontmatter::{extract_frontmatter, strip_frontmatter, FrontmatterResult, FrontmatterValue};
pub use links::{parse_links, AnnotatedMarkdown, CustomLink, LinkKind, Piece, Segment};
pub use parser::{
    events, extract_all_headings, extract_first_paragraph,
    extract_headings, extract_title, heading_text, markdown_options, Heading,
};
