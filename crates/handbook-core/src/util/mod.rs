//! Utility modules for file discovery, path handling, and identifiers.
//!
//! # Modules
//!
//! - [`files`]: Async markdown file discovery
//! - [`ids`]: Identifier normalization, heading anchors, display titles
//! - [`paths`]: Generic path utilities (binary location, tilde expansion)
//! - [`resolver`]: Content root resolution

pub mod files;
pub mod ids;
pub mod paths;
pub mod resolver;
