//! Frontmatter extraction from markdown files.
//!
//! Frontmatter is a flat block of `key: value` lines at the very start of a
//! file, delimited by lines of exactly `---`:
//!
//! ```markdown
//! ---
//! title: Group Fairness
//! order: 2
//! final: false
//! ---
//!
//! # Group Fairness
//! ```
//!
//! Values are coerced to [`FrontmatterValue`]: `true`/`false` become
//! booleans, anything that parses as a finite number becomes a number, and
//! everything else stays a string. Extraction never fails; a block that is
//! missing its opening or closing marker is treated as "no frontmatter".
//!
//! # Usage
//!
//! ```rust
//! use handbook_content::markdown::extract_frontmatter;
//!
//! let content = "---\ntitle: Test\norder: 2\n---\n\nBody";
//! let result = extract_frontmatter(content);
//!
//! assert!(result.has_frontmatter());
//! assert_eq!(result.body().trim(), "Body");
//! assert_eq!(result.get_str("title"), Some("Test"));
//! assert_eq!(result.get_i64("order"), Some(2));
//! ```

use std::fmt;

use handbook_core::{Error, Result};
use serde::de::DeserializeOwned;

const DELIMITER: &str = "---";

// ============================================================================
// FrontmatterValue
// ============================================================================

/// A coerced frontmatter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FrontmatterValue {
    /// `true` or `false`
    Bool(bool),
    /// Integer or decimal, optionally signed
    Number(f64),
    /// Anything else, trimmed and unquoted
    String(String),
}

impl FrontmatterValue {
    /// Coerce a raw value string.
    ///
    /// ```rust
    /// use handbook_content::markdown::FrontmatterValue;
    ///
    /// assert_eq!(FrontmatterValue::coerce("true"), FrontmatterValue::Bool(true));
    /// assert_eq!(FrontmatterValue::coerce("-1.5"), FrontmatterValue::Number(-1.5));
    /// assert_eq!(
    ///     FrontmatterValue::coerce("\"2\""),
    ///     FrontmatterValue::String("2".to_string())
    /// );
    /// ```
    pub fn coerce(raw: &str) -> Self {
        let raw = raw.trim();
        match raw {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }

        if looks_numeric(raw) {
            if let Ok(n) = raw.parse::<f64>() {
                if n.is_finite() {
                    return Self::Number(n);
                }
            }
        }

        Self::String(unquote(raw).to_string())
    }

    /// Borrow the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is a whole number.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            _ => None,
        }
    }

    /// Get the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                serde_json::Value::from(*n as i64)
            }
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for FrontmatterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// Only plain decimal notation counts as a number; `inf`, `NaN` and
/// exponents stay strings.
fn looks_numeric(raw: &str) -> bool {
    let digits = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1
}

fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

// ============================================================================
// FrontmatterResult
// ============================================================================

/// Result of frontmatter extraction.
///
/// Holds the parsed fields in declaration order and the body that follows
/// the closing delimiter.
#[derive(Debug, Clone)]
pub struct FrontmatterResult<'a> {
    fields: Vec<(String, FrontmatterValue)>,
    body: &'a str,
    had_block: bool,
}

impl<'a> FrontmatterResult<'a> {
    fn without_frontmatter(body: &'a str) -> Self {
        Self {
            fields: Vec::new(),
            body,
            had_block: false,
        }
    }

    /// Check if a delimited block was found (it may still be empty).
    pub fn has_frontmatter(&self) -> bool {
        self.had_block
    }

    /// Get the body content (everything after the closing delimiter).
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Number of parsed fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields were parsed.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontmatterValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Get a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Get an integer field.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_i64()
    }

    /// Get a boolean field.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    /// Deserialize the fields into a specific type.
    ///
    /// Returns `None` if no frontmatter block was found, and `Err` if the
    /// fields do not fit `T`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use handbook_content::markdown::extract_frontmatter;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Meta {
    ///     title: String,
    ///     order: Option<i64>,
    /// }
    ///
    /// let result = extract_frontmatter("---\ntitle: Hello\norder: 3\n---\nBody");
    /// let meta: Meta = result.deserialize().unwrap().unwrap();
    /// assert_eq!(meta.title, "Hello");
    /// assert_eq!(meta.order, Some(3));
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        if !self.had_block {
            return Ok(None);
        }

        let object: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();

        serde_json::from_value(serde_json::Value::Object(object))
            .map(Some)
            .map_err(|e| Error::parse(format!("Failed to deserialize frontmatter: {e}")))
    }

    fn insert(&mut self, key: String, value: FrontmatterValue) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Extract frontmatter from markdown content.
///
/// # Behavior
///
/// - First line is not exactly `---`: body is the input, no fields
/// - No closing `---` line: body is the input, no fields (logged)
/// - Otherwise: body starts after the closing line; `key: value` lines are
///   parsed, blank lines and lines without a colon are skipped
///
/// LF and CRLF line endings are both accepted.
///
/// ```rust
/// use handbook_content::markdown::extract_frontmatter;
///
/// let result = extract_frontmatter("---\r\ntitle: Windows\r\n---\r\nBody");
/// assert_eq!(result.get_str("title"), Some("Windows"));
/// assert_eq!(result.body(), "Body");
///
/// let result = extract_frontmatter("# Just Markdown");
/// assert!(!result.has_frontmatter());
/// assert_eq!(result.body(), "# Just Markdown");
/// ```
pub fn extract_frontmatter(content: &str) -> FrontmatterResult<'_> {
    let mut lines = LineCursor::new(content);

    match lines.next() {
        Some((line, _)) if line == DELIMITER => {}
        _ => return FrontmatterResult::without_frontmatter(content),
    }

    let mut result = FrontmatterResult::without_frontmatter(content);

    for (line, rest_start) in lines {
        if line == DELIMITER {
            result.had_block = true;
            result.body = &content[rest_start..];
            return result;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        result.insert(key.to_string(), FrontmatterValue::coerce(value));
    }

    log::warn!("Frontmatter opening delimiter found but no closing delimiter");
    FrontmatterResult::without_frontmatter(content)
}

/// Strip frontmatter from content, returning only the body.
///
/// ```rust
/// use handbook_content::markdown::strip_frontmatter;
///
/// let body = strip_frontmatter("---\ntitle: Test\n---\n\n# Heading");
/// assert_eq!(body.trim(), "# Heading");
/// ```
pub fn strip_frontmatter(content: &str) -> &str {
    extract_frontmatter(content).body()
}

/// Yields each line without its terminator, plus the byte offset where the
/// following line starts.
struct LineCursor<'a> {
    content: &'a str,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(content: &'a str) -> Self {
        Self { content, pos: 0 }
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.content.len() {
            return None;
        }

        let rest = &self.content[self.pos..];
        let (raw, advance) = match rest.find('\n') {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        self.pos += advance;

        let line = raw.strip_suffix('\r').unwrap_or(raw);
        Some((line, self.pos))
    }
}

// ============================================================================
// Tests
// ============================================================================
