//! Route parsing.
//!
//! Three route shapes exist: `/`, `/:section` and `/:section/:subsection`,
//! each with an optional `#anchor`. Leading and trailing slashes are
//! ignored, as is a query string. Anything deeper than two segments is not
//! a page.

use std::fmt;
use std::str::FromStr;

use handbook_core::Error;
use serde::{Deserialize, Serialize};

/// A place in the handbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Section id; `None` is the root route.
    pub section: Option<String>,
    /// Subsection id within `section`.
    pub subsection: Option<String>,
    /// In-page anchor, without the `#`.
    pub anchor: Option<String>,
}

impl Location {
    /// The root route, `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// A section route.
    pub fn section(id: impl Into<String>) -> Self {
        Self {
            section: Some(id.into()),
            ..Self::default()
        }
    }

    /// A subsection route.
    pub fn subsection(section: impl Into<String>, subsection: impl Into<String>) -> Self {
        Self {
            section: Some(section.into()),
            subsection: Some(subsection.into()),
            anchor: None,
        }
    }

    /// The same location with an anchor.
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        let anchor = anchor.into();
        self.anchor = (!anchor.is_empty()).then_some(anchor);
        self
    }

    /// The same location without an anchor.
    pub fn without_anchor(&self) -> Self {
        Self {
            anchor: None,
            ..self.clone()
        }
    }

    /// Parse a route. Returns `None` for routes that cannot name a page.
    ///
    /// ```rust
    /// use handbook_site::Location;
    ///
    /// let loc = Location::parse("/privacy/consent/?tab=2#key-terms").unwrap();
    /// assert_eq!(loc, Location::subsection("privacy", "consent").with_anchor("key-terms"));
    ///
    /// assert!(Location::parse("/a/b/c").is_none());
    /// ```
    pub fn parse(route: &str) -> Option<Self> {
        let (path, anchor) = match route.split_once('#') {
            Some((path, anchor)) => (path, Some(anchor)),
            None => (route, None),
        };
        let path = path.split_once('?').map_or(path, |(p, _)| p);
        let path = path.trim().trim_matches('/');

        let mut location = if path.is_empty() {
            Self::root()
        } else {
            let segments: Vec<&str> = path.split('/').collect();
            if segments.iter().any(|s| s.trim().is_empty()) {
                return None;
            }
            match segments.as_slice() {
                [section] => Self::section(*section),
                [section, subsection] => Self::subsection(*section, *subsection),
                _ => return None,
            }
        };

        if let Some(anchor) = anchor {
            location = location.with_anchor(anchor.trim());
        }
        Some(location)
    }

    /// Whether this is `/`.
    pub fn is_root(&self) -> bool {
        self.section.is_none()
    }

    /// Whether this names a subsection.
    pub fn is_subsection(&self) -> bool {
        self.section.is_some() && self.subsection.is_some()
    }

    /// Route path without the anchor.
    pub fn path(&self) -> String {
        match (&self.section, &self.subsection) {
            (Some(section), Some(sub)) => format!("/{section}/{sub}"),
            (Some(section), None) => format!("/{section}"),
            _ => "/".to_string(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())?;
        if let Some(anchor) = &self.anchor {
            write!(f, "#{anchor}")?;
        }
        Ok(())
    }
}

impl FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::not_found(s, "route"))
    }
}

// ============================================================================
// Tests
// ============================================================================
