//! Error types for handbook-core

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for handbook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, indexing, or serving handbook content.
///
/// Lookups of individual sections, subsections, or drawer notes do not use
/// this type; they return `Option` so that "not found" stays distinguishable
/// from a failure to read the content set.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O error, with the path that caused it when known.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A requested item does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What kind of item was requested (e.g. "section", "content directory")
        kind: String,
        /// Identifier or path of the missing item
        id: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// Parse error (frontmatter deserialization, routes, values)
    #[error("Parse error: {message}")]
    Parse {
        /// What failed to parse
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Creates an I/O error tagged with the offending path.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a not-found error.
    pub fn not_found(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Error::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse {
            message: message.into(),
        }
    }

    /// Returns whether a manual retry could plausibly succeed.
    ///
    /// I/O failures (a content directory mid-copy, a missing mount) are worth
    /// retrying; bad configuration or malformed input is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Io { .. } => true,
            Error::NotFound { .. } => true,
            Error::Config { .. } => false,
            Error::Parse { .. } => false,
            Error::Json(_) => false,
            Error::Toml(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("privacy", "section");
        assert_eq!(err.to_string(), "section not found: privacy");
    }

    #[test]
    fn test_io_with_path_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io_with_path(io, "/content/fairness.md");
        let msg = err.to_string();
        assert!(msg.contains("/content/fairness.md"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("content_dir is empty");
        assert_eq!(err.to_string(), "Configuration error: content_dir is empty");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_parse_error() {
        let err = Error::parse("bad route");
        assert_eq!(err.to_string(), "Parse error: bad route");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_classification() {
        let io = std::io::Error::other("busy");
        assert!(Error::io_with_path(io, "x").is_retryable());
        assert!(Error::not_found("content", "content directory").is_retryable());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope}").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
