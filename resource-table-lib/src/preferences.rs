//! Display preferences persisted in a cookie.

use serde::Deserialize;
use serde::Serialize;

const SETTINGS_VISIBLE: &str = "settingsVisible";

/// User preferences that survive reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Whether the column settings panel is open.
    pub settings_visible: bool,
}

impl Preferences {
    /// Renders the preferences as a `name=value` cookie pair.
    pub fn to_cookie(&self) -> String {
        format!("{SETTINGS_VISIBLE}={}", self.settings_visible)
    }

    /// Reads preferences out of a `Cookie` header.
    ///
    /// Unknown cookies are ignored and malformed values fall back to the
    /// defaults.
    pub fn from_cookie(header: &str) -> Self {
        let settings_visible = header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SETTINGS_VISIBLE)
            .and_then(|(_, value)| value.trim().parse().ok())
            .unwrap_or_default();
        Self { settings_visible }
    }

    /// Flips the settings panel.
    pub fn toggle_settings(&mut self) -> bool {
        self.settings_visible = !self.settings_visible;
        self.settings_visible
    }
}
