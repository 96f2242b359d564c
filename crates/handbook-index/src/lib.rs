//! Content discovery, categorization, ordering and lookup for handbook
//! markdown.
//!
//! [`IndexBuilder`] walks a content root laid out as sections, subsections
//! and drawer notes, and produces an immutable [`ContentIndex`] snapshot
//! plus [`BuildStats`]. Lookups on the index return `Option`; only failure
//! to enumerate the content root is an error.
//!
//! # Example
//!
//! ```rust,no_run
//! use handbook_index::IndexBuilder;
//!
//! # async fn example() -> handbook_core::Result<()> {
//! let (index, stats) = IndexBuilder::new()
//!     .with_content_path("/srv/handbook/markdown")
//!     .build()
//!     .await?;
//!
//! println!("{} sections ({} ignored files)", index.sections().len(), stats.ignored);
//! if let Some(section) = index.default_section() {
//!     println!("Home: {}", section.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod category;
pub mod fingerprint;
pub mod index;
pub mod layout;
pub mod model;
pub mod nav;

pub use builder::{BuildError, BuildStats, IndexBuilder, DEFAULT_EXCLUDED_DIRS};
pub use category::{Category, CategoryResolver, CategorySource, DEFAULT_CATEGORY};
pub use fingerprint::content_fingerprint;
pub use index::ContentIndex;
pub use layout::{classify, FileRole};
pub use model::{DrawerNote, Page, DEFAULT_ORDER};
pub use nav::{NavAnchor, NavGroup, NavSection, NavSubsection, NavTree};
