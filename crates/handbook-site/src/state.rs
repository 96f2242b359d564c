//! Centralized UI state.

use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::prefs::DisplayPreferences;

/// An open drawer note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryContent {
    /// Drawer note id
    pub note_id: String,
    pub title: String,
    /// Rendered note body
    pub html: String,
}

/// Everything the shell needs to draw the current screen besides the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    /// Location shown in the address bar
    pub current_location: Location,
    /// Open drawer note, if any
    pub auxiliary_content: Option<AuxiliaryContent>,
    #[serde(default)]
    pub display_preferences: DisplayPreferences,
}

impl UiState {
    /// State with the given preferences and nothing loaded.
    pub fn with_preferences(display_preferences: DisplayPreferences) -> Self {
        Self {
            display_preferences,
            ..Self::default()
        }
    }

    /// Whether a drawer note is open.
    pub fn drawer_open(&self) -> bool {
        self.auxiliary_content.is_some()
    }
}
