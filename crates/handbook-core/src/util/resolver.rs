//! Content root resolution.
//!
//! `PathResolver` locates the markdown content directory using, in order,
//! an environment variable, a marker directory found by walking up from the
//! running binary or the working directory, and a fallback path.
//!
//! # Example
//!
//! ```no_run
//! use handbook_core::util::resolver::PathResolver;
//!
//! let resolver = PathResolver::new("handbook")
//!     .with_content_marker("markdown")
//!     .with_content_fallback("~/handbook/markdown");
//!
//! // Checks HANDBOOK_CONTENT_DIR first, then searches for `markdown/`.
//! if let Some(root) = resolver.content_dir() {
//!     println!("Content: {}", root.display());
//! }
//! ```

use std::env;
use std::path::{Path, PathBuf};

use crate::util::paths::{binary_dir, expand_tilde, find_dir_with_marker};

/// Configurable content-root resolver for a project.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Project name (e.g., "handbook")
    project_name: String,
    /// Environment variable prefix (e.g., "HANDBOOK")
    env_prefix: String,
    /// Directory name that holds the content (e.g., "markdown")
    content_marker: Option<String>,
    /// Fallback content directory (expanded with tilde)
    content_fallback: Option<PathBuf>,
}

impl PathResolver {
    /// Create a new resolver for the given project name.
    ///
    /// The project name becomes the environment variable prefix:
    /// - "handbook" → "HANDBOOK"
    /// - "src-handbook" → "SRC_HANDBOOK"
    pub fn new(project_name: &str) -> Self {
        let env_prefix = project_name.to_uppercase().replace(['-', ' '], "_");

        Self {
            project_name: project_name.to_string(),
            env_prefix,
            content_marker: None,
            content_fallback: None,
        }
    }

    /// Set the directory name that identifies the content root.
    pub fn with_content_marker(mut self, marker: &str) -> Self {
        self.content_marker = Some(marker.to_string());
        self
    }

    /// Set a fallback content directory (supports ~ expansion).
    pub fn with_content_fallback(mut self, path: &str) -> Self {
        self.content_fallback = Some(expand_tilde(path));
        self
    }

    /// Get the environment variable name for a given suffix.
    ///
    /// ```
    /// use handbook_core::util::resolver::PathResolver;
    ///
    /// let resolver = PathResolver::new("handbook");
    /// assert_eq!(resolver.env_var("CONTENT_DIR"), "HANDBOOK_CONTENT_DIR");
    /// ```
    pub fn env_var(&self, suffix: &str) -> String {
        format!("{}_{}", self.env_prefix, suffix)
    }

    /// Resolve the content directory.
    ///
    /// Checks in order:
    /// 1. `{PROJECT}_CONTENT_DIR` environment variable
    /// 2. Walk up from the binary, then from the working directory, looking
    ///    for the content marker
    /// 3. Fallback path (if configured)
    pub fn content_dir(&self) -> Option<PathBuf> {
        let env_var = self.env_var("CONTENT_DIR");
        if let Ok(path) = env::var(&env_var) {
            let path = expand_tilde(&path);
            if path.exists() {
                return Some(path);
            }
            log::warn!("{env_var} points at {} which does not exist", path.display());
        }

        if let Some(marker) = &self.content_marker {
            let starts = [binary_dir(), env::current_dir().ok()];
            for start in starts.iter().flatten() {
                if let Some(root) = find_dir_with_marker(start, marker) {
                    return Some(root.join(marker));
                }
            }
        }

        self.content_fallback
            .as_deref()
            .filter(|p| p.exists())
            .map(Path::to_path_buf)
    }

    /// Get the project name.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Get the environment variable prefix.
    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_simple_name() {
        let resolver = PathResolver::new("handbook");
        assert_eq!(resolver.project_name(), "handbook");
        assert_eq!(resolver.env_prefix(), "HANDBOOK");
    }

    #[test]
    fn test_new_kebab_case_name() {
        let resolver = PathResolver::new("src-handbook");
        assert_eq!(resolver.env_prefix(), "SRC_HANDBOOK");
    }

    #[test]
    fn test_env_var() {
        let resolver = PathResolver::new("handbook");
        assert_eq!(resolver.env_var("CONTENT_DIR"), "HANDBOOK_CONTENT_DIR");
        assert_eq!(resolver.env_var("CONFIG"), "HANDBOOK_CONFIG");
    }

    #[test]
    fn test_content_dir_from_env() {
        let resolver = PathResolver::new("handbook-test-env");
        let temp_dir = tempfile::tempdir().unwrap();

        // SAFETY: no other test reads or writes this variable.
        unsafe { env::set_var("HANDBOOK_TEST_ENV_CONTENT_DIR", temp_dir.path()) };
        let result = resolver.content_dir();
        unsafe { env::remove_var("HANDBOOK_TEST_ENV_CONTENT_DIR") };

        assert_eq!(result, Some(temp_dir.path().to_path_buf()));
    }

    #[test]
    fn test_content_dir_with_fallback() {
        let temp_dir = tempfile::tempdir().unwrap();
        let resolver = PathResolver::new("nonexistent-handbook-project")
            .with_content_fallback(&temp_dir.path().to_string_lossy());

        assert_eq!(resolver.content_dir(), Some(temp_dir.path().to_path_buf()));
    }

    #[test]
    fn test_content_dir_missing_fallback() {
        let resolver = PathResolver::new("definitely-nonexistent-handbook-xyz")
            .with_content_fallback("/definitely/not/a/real/path/xyz");
        assert!(resolver.content_dir().is_none());
    }

    #[test]
    fn test_content_dir_nothing_configured() {
        let resolver = PathResolver::new("definitely-nonexistent-handbook-xyz");
        assert!(resolver.content_dir().is_none());
    }
}
