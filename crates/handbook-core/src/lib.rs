//! Handbook Core: shared errors, identifiers, paths, and load status.
//!
//! This crate provides the foundational pieces used across all handbook
//! crates. It has no internal handbook dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`status`]: Content library load status, observable across tasks
//! - [`util`]: File discovery, path resolution, IDs and heading anchors

pub mod error;
pub mod status;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use status::{LibraryStatus, StatusHandle};

// Convenience re-exports from util
pub use util::ids::{heading_anchor, id_from_path, normalize_id, prettify_id};
pub use util::resolver::PathResolver;
