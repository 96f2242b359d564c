//! Display preferences.
//!
//! Reader-adjustable settings that travel with the UI state. Widths are in
//! pixels and are always kept inside their allowed range.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Allowed sidebar widths.
pub const SIDEBAR_WIDTH_RANGE: RangeInclusive<u32> = 180..=600;
/// Allowed content column widths.
pub const CONTENT_WIDTH_RANGE: RangeInclusive<u32> = 400..=1600;
/// Allowed drawer widths.
pub const DRAWER_WIDTH_RANGE: RangeInclusive<u32> = 250..=800;

/// Light or dark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

/// Base text size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Sm,
    #[default]
    Md,
    Lg,
}

/// Typeface, including faces chosen for low vision and dyslexia.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    #[default]
    System,
    Inter,
    Atkinson,
    OpenDyslexic,
    Roboto,
    SourceSansPro,
}

/// The full set of display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayPreferences {
    pub color_mode: ColorMode,
    /// Accent color name, e.g. `blue`
    pub primary_color: String,
    pub font_size: FontSize,
    pub font_family: FontFamily,
    pub sidebar_width: u32,
    pub content_width: u32,
    pub drawer_width: u32,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Light,
            primary_color: "blue".to_string(),
            font_size: FontSize::Md,
            font_family: FontFamily::System,
            sidebar_width: 280,
            content_width: 800,
            drawer_width: 400,
        }
    }
}

/// A partial change to [`DisplayPreferences`]; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesUpdate {
    pub color_mode: Option<ColorMode>,
    pub primary_color: Option<String>,
    pub font_size: Option<FontSize>,
    pub font_family: Option<FontFamily>,
    pub sidebar_width: Option<u32>,
    pub content_width: Option<u32>,
    pub drawer_width: Option<u32>,
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

impl DisplayPreferences {
    /// Apply a partial update, clamping widths into range.
    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(mode) = update.color_mode {
            self.color_mode = mode;
        }
        if let Some(color) = update.primary_color {
            let color = color.trim();
            if !color.is_empty() {
                self.primary_color = color.to_string();
            }
        }
        if let Some(size) = update.font_size {
            self.font_size = size;
        }
        if let Some(family) = update.font_family {
            self.font_family = family;
        }
        if let Some(width) = update.sidebar_width {
            self.sidebar_width = width;
        }
        if let Some(width) = update.content_width {
            self.content_width = width;
        }
        if let Some(width) = update.drawer_width {
            self.drawer_width = width;
        }
        self.clamp_widths();
    }

    /// The same preferences with every width inside its range.
    ///
    /// Use after deserializing values that did not go through [`apply`](Self::apply).
    pub fn clamped(mut self) -> Self {
        self.clamp_widths();
        self
    }

    fn clamp_widths(&mut self) {
        self.sidebar_width = clamp(self.sidebar_width, &SIDEBAR_WIDTH_RANGE);
        self.content_width = clamp(self.content_width, &CONTENT_WIDTH_RANGE);
        self.drawer_width = clamp(self.drawer_width, &DRAWER_WIDTH_RANGE);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = DisplayPreferences::default();
        assert_eq!(prefs.sidebar_width, 280);
        assert_eq!(prefs.content_width, 800);
        assert_eq!(prefs.drawer_width, 400);
        assert_eq!(prefs.font_family, FontFamily::System);
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let mut prefs = DisplayPreferences::default();
        prefs.apply(PreferencesUpdate {
            color_mode: Some(ColorMode::Dark),
            ..Default::default()
        });
        assert_eq!(prefs.color_mode, ColorMode::Dark);
        assert_eq!(prefs.primary_color, "blue");
        assert_eq!(prefs.sidebar_width, 280);
    }

    #[test]
    fn test_widths_are_clamped() {
        let mut prefs = DisplayPreferences::default();
        prefs.apply(PreferencesUpdate {
            sidebar_width: Some(10),
            content_width: Some(5000),
            drawer_width: Some(801),
            ..Default::default()
        });
        assert_eq!(prefs.sidebar_width, 180);
        assert_eq!(prefs.content_width, 1600);
        assert_eq!(prefs.drawer_width, 800);
    }

    #[test]
    fn test_blank_color_ignored() {
        let mut prefs = DisplayPreferences::default();
        prefs.apply(PreferencesUpdate {
            primary_color: Some("  ".into()),
            ..Default::default()
        });
        assert_eq!(prefs.primary_color, "blue");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_value(DisplayPreferences {
            font_family: FontFamily::OpenDyslexic,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json["font_family"], "open-dyslexic");
        assert_eq!(json["color_mode"], "light");
        assert_eq!(json["font_size"], "md");
    }

    #[test]
    fn test_deserialize_partial_then_clamp() {
        let prefs: DisplayPreferences =
            serde_json::from_str(r#"{"drawer_width": 9000, "font_family": "source-sans-pro"}"#)
                .unwrap();
        let prefs = prefs.clamped();
        assert_eq!(prefs.drawer_width, 800);
        assert_eq!(prefs.font_family, FontFamily::SourceSansPro);
        assert_eq!(prefs.sidebar_width, 280);
    }
}
