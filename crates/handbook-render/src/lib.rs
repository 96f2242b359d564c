//! HTML rendering for handbook pages.
//!
//! Turns a page or drawer note body into an HTML fragment plus the metadata
//! the page controller needs: the title, the level-two heading anchors and
//! the navigation and drawer controls the page exposes.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashSet;
//! use handbook_render::{render_markdown, Action};
//!
//! let drawers: HashSet<String> = ["parity".to_string()].into_iter().collect();
//! let page = render_markdown("# Metrics\n\nSee [drawer:Parity](parity).", &drawers);
//!
//! assert_eq!(page.title.as_deref(), Some("Metrics"));
//! assert_eq!(page.actions, vec![Action::OpenDrawer("parity".to_string())]);
//! ```

pub mod drawer;
pub mod escape;
pub mod render;

pub use drawer::{DrawerLookup, NoDrawers};
pub use escape::escape_html;
pub use render::{render_markdown, Action, RenderedPage};
