//! Handbook configuration.
//!
//! Loaded from TOML. The file is found by checking, in order, an explicit
//! `--config` path, the `HANDBOOK_CONFIG` environment variable, and
//! `<config dir>/handbook/config.toml`. A missing file at the default
//! location means defaults; a missing file that was asked for by name is an
//! error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use handbook_core::util::paths::expand_tilde;
use handbook_core::{Error, PathResolver, Result};
use handbook_index::{IndexBuilder, DEFAULT_EXCLUDED_DIRS};
use handbook_site::DisplayPreferences;
use serde::{Deserialize, Serialize};

/// Project name, used for the config directory and env var prefix.
pub const PROJECT_NAME: &str = "handbook";

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "HANDBOOK_CONFIG";

/// Settings for the `handbook` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandbookConfig {
    /// Markdown content root
    pub content_dir: Option<String>,

    /// Where `build` writes the static site
    pub output_dir: String,

    /// Section shown for `/`; the first section when unset or unknown
    pub default_section: Option<String>,

    /// Top-level directories to skip
    pub excluded_dirs: Vec<String>,

    /// Guess categories from ids when neither frontmatter nor `[categories]`
    /// names one
    pub infer_categories: bool,

    /// Declared content-id → category mapping
    pub categories: BTreeMap<String, String>,

    /// Default display preferences
    pub display: DisplayPreferences,
}

impl Default for HandbookConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            output_dir: "site".to_string(),
            default_section: Some("algorithmic-fairness".to_string()),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            infer_categories: false,
            categories: BTreeMap::new(),
            display: DisplayPreferences::default(),
        }
    }
}

impl HandbookConfig {
    /// `<config dir>/handbook/config.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(PROJECT_NAME).join("config.toml"))
    }

    /// Resolve the config file path.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(expand_tilde(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(expand_tilde(&path));
            }
        }
        Self::default_config_path()
    }

    /// Load the configuration.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit) else {
            log::debug!("No config directory on this platform; using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            if explicit.is_some() {
                return Err(Error::not_found(path.display().to_string(), "config file"));
            }
            log::debug!("No config at {}; using defaults", path.display());
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let mut config: Self = toml::from_str(&content)?;
        config.display = config.display.clamped();
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// The settings the pipeline reads from the environment, as `KEY=VALUE`
    /// pairs.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let resolver = PathResolver::new(PROJECT_NAME);
        let mut vars = Vec::new();

        if let Some(dir) = &self.content_dir {
            vars.push((resolver.env_var("CONTENT_DIR"), dir.clone()));
        }
        vars.push((resolver.env_var("OUTPUT_DIR"), self.output_dir.clone()));
        if let Some(id) = &self.default_section {
            vars.push((resolver.env_var("DEFAULT_SECTION"), id.clone()));
        }
        vars.push((
            resolver.env_var("EXCLUDED_DIRS"),
            self.excluded_dirs.join(","),
        ));
        vars.push((
            resolver.env_var("INFER_CATEGORIES"),
            self.infer_categories.to_string(),
        ));
        vars.push((
            resolver.env_var("DISPLAY"),
            serde_json::to_string(&self.display)?,
        ));
        Ok(vars)
    }

    /// Resolve the content root: the command-line override, then
    /// `content_dir`, then `HANDBOOK_CONTENT_DIR` or a `markdown/` directory
    /// near the binary or working directory.
    pub fn content_root(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_override {
            return Ok(path.to_path_buf());
        }
        if let Some(dir) = &self.content_dir {
            return Ok(expand_tilde(dir));
        }
        PathResolver::new(PROJECT_NAME)
            .with_content_marker("markdown")
            .content_dir()
            .ok_or_else(|| {
                Error::config(
                    "No content directory. Pass --content, set content_dir, or set HANDBOOK_CONTENT_DIR.",
                )
            })
    }

    /// An index builder for `content_root` with these settings.
    pub fn index_builder(&self, content_root: impl Into<PathBuf>) -> IndexBuilder {
        IndexBuilder::new()
            .with_content_path(content_root)
            .with_excluded_dirs(self.excluded_dirs.clone())
            .with_category_mapping(self.categories.clone())
            .with_inferred_categories(self.infer_categories)
            .with_default_section(self.default_section.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
