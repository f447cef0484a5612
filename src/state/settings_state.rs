//! User preferences: the four settings fields, their persistence and effects
//!
//! The persisted record keeps all four values as strings, exactly as entered.
//! Loading validates shape strictly: a record missing any field, or carrying
//! a non-string where a string is expected, is ignored wholesale.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FONT_SIZE, DEFAULT_VOLUME, FONT_SIZE_MAX, FONT_SIZE_MIN, KEY_SETTINGS};
use crate::utils::kv_store::KvStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub volume: String,
    #[serde(rename = "spotifyToggle")]
    pub spotify_toggle: String,
    pub theme: String,
    #[serde(rename = "fontSize")]
    pub font_size: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME.to_string(),
            spotify_toggle: "off".to_string(),
            theme: "light".to_string(),
            font_size: DEFAULT_FONT_SIZE.to_string(),
        }
    }
}

/// Page-level effects derived from a preferences record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedSettings {
    /// 0.0-1.0, applied to every media element
    pub volume: f32,
    pub player_visible: bool,
    pub dark_theme: bool,
    pub font_px: f32,
}

impl Preferences {
    /// Interpret the string fields. Malformed numerics fall back to defaults
    /// rather than erroring.
    pub fn effects(&self) -> AppliedSettings {
        let volume: f32 = self.volume.parse().unwrap_or(0.0);
        let font_px: f32 = self
            .font_size
            .parse()
            .unwrap_or(f32::from(DEFAULT_FONT_SIZE));
        AppliedSettings {
            volume: (volume / 100.0).clamp(0.0, 1.0),
            player_visible: self.spotify_toggle == "on",
            dark_theme: self.theme == "dark",
            font_px: font_px.clamp(f32::from(FONT_SIZE_MIN), f32::from(FONT_SIZE_MAX)),
        }
    }

    /// Persist the record as one JSON object with the four exact strings
    pub fn save(&self, store: &KvStore) {
        match serde_json::to_string(self) {
            Ok(json) => store.set(KEY_SETTINGS, &json),
            Err(e) => log::error!("[Menu] Failed to serialize settings: {}", e),
        }
    }

    /// Load the saved record. Any shape violation (missing field, wrong kind,
    /// broken JSON) yields `None` and is never an error.
    pub fn load_saved(store: &KvStore) -> Option<Self> {
        let raw = store.get(KEY_SETTINGS)?;
        match serde_json::from_str(&raw) {
            Ok(prefs) => Some(prefs),
            Err(e) => {
                log::warn!("[Menu] Ignoring invalid saved settings: {}", e);
                None
            }
        }
    }
}

/// Form state behind the settings overlay widgets
pub struct SettingsState {
    pub volume: u8,
    pub player_enabled: bool,
    pub theme: String,
    pub font_size: u8,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            player_enabled: false,
            theme: "light".to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl SettingsState {
    /// Snapshot the form into a persistable record
    pub fn to_preferences(&self) -> Preferences {
        Preferences {
            volume: self.volume.to_string(),
            spotify_toggle: if self.player_enabled { "on" } else { "off" }.to_string(),
            theme: self.theme.clone(),
            font_size: self.font_size.to_string(),
        }
    }

    /// Fill the form from a loaded record; unparseable numerics keep defaults
    pub fn load_from(&mut self, prefs: &Preferences) {
        self.volume = prefs.volume.parse().unwrap_or(DEFAULT_VOLUME).min(100);
        self.player_enabled = prefs.spotify_toggle == "on";
        self.theme = prefs.theme.clone();
        self.font_size = prefs
            .font_size
            .parse()
            .unwrap_or(DEFAULT_FONT_SIZE)
            .clamp(FONT_SIZE_MIN, FONT_SIZE_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Preferences {
        Preferences {
            volume: "70".to_string(),
            spotify_toggle: "on".to_string(),
            theme: "dark".to_string(),
            font_size: "18".to_string(),
        }
    }

    #[test]
    fn effects_scale_and_flag_correctly() {
        let effects = sample().effects();
        assert!((effects.volume - 0.70).abs() < f32::EPSILON);
        assert!(effects.player_visible);
        assert!(effects.dark_theme);
        assert!((effects.font_px - 18.0).abs() < f32::EPSILON);
    }

    #[test]
    fn persisted_record_keeps_exact_strings() {
        let store = KvStore::in_memory().unwrap();
        sample().save(&store);
        let raw = store.get(KEY_SETTINGS).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["volume"], "70");
        assert_eq!(value["spotifyToggle"], "on");
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["fontSize"], "18");
    }

    #[test]
    fn save_load_roundtrip() {
        let store = KvStore::in_memory().unwrap();
        sample().save(&store);
        assert_eq!(Preferences::load_saved(&store), Some(sample()));
    }

    #[test]
    fn record_missing_theme_is_ignored() {
        let store = KvStore::in_memory().unwrap();
        store.set(
            KEY_SETTINGS,
            r#"{"volume":"70","spotifyToggle":"on","fontSize":"18"}"#,
        );
        assert_eq!(Preferences::load_saved(&store), None);
    }

    #[test]
    fn record_with_wrong_kind_is_ignored() {
        let store = KvStore::in_memory().unwrap();
        store.set(
            KEY_SETTINGS,
            r#"{"volume":70,"spotifyToggle":"on","theme":"dark","fontSize":"18"}"#,
        );
        assert_eq!(Preferences::load_saved(&store), None);
    }

    #[test]
    fn corrupted_json_is_ignored() {
        let store = KvStore::in_memory().unwrap();
        store.set(KEY_SETTINGS, "{not json");
        assert_eq!(Preferences::load_saved(&store), None);
    }

    #[test]
    fn malformed_volume_defaults_to_zero() {
        let mut prefs = sample();
        prefs.volume = "loud".to_string();
        assert!((prefs.effects().volume - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn volume_is_clamped_to_unit_range() {
        let mut prefs = sample();
        prefs.volume = "250".to_string();
        assert!((prefs.effects().volume - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn form_roundtrip() {
        let mut form = SettingsState::default();
        form.load_from(&sample());
        assert_eq!(form.volume, 70);
        assert!(form.player_enabled);
        assert_eq!(form.theme, "dark");
        assert_eq!(form.font_size, 18);
        assert_eq!(form.to_preferences(), sample());
    }
}
