//! Gameplay tuning
//!
//! Persisted separately from progress: a JSON file natively, LocalStorage on
//! the web. Anything missing falls back to the defaults.

use serde::{Deserialize, Serialize};

/// Tuning values read by the game logic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Distance moved per frame
    pub player_speed: f32,
    /// Blend factor from the current heading toward the pressed direction
    pub direction_blend: f32,
    /// Real time between being caught and the level restarting
    pub game_over_delay_ms: f64,
    /// Player width as a fraction of the grid size
    pub player_scale: f32,
    /// Collision radius as a fraction of the player width
    pub collision_radius: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_speed: 10.0,
            direction_blend: 0.95,
            game_over_delay_ms: 3000.0,
            player_scale: 1.0,
            collision_radius: 0.3,
        }
    }
}

impl Settings {
    /// Storage key / file stem
    const STORAGE_KEY: &'static str = "fearwater_settings";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from LocalStorage (WASM only)
    ///
    /// The first run stores the defaults.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        let settings = Self::default();
        settings.save();
        settings
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn path() -> std::path::PathBuf {
        std::path::PathBuf::from(format!("{}.json", Self::STORAGE_KEY))
    }

    /// Load settings from the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        self.save_to(&Self::path());
    }

    /// Read `path`; a missing file is created with the defaults so it can be
    /// edited, a broken one is left alone
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                let settings = Self::default();
                settings.save_to(path);
                settings
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) {
        match self.to_json() {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => log::info!("Settings saved to {}", path.display()),
                Err(e) => log::warn!("Failed to write {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{ "player_speed": 6.5 }"#).unwrap();
        assert_eq!(s.player_speed, 6.5);
        assert_eq!(s.direction_blend, 0.95);
        assert_eq!(s.game_over_delay_ms, 3000.0);
    }

    #[test]
    fn test_json_round_trip() {
        let s = Settings {
            collision_radius: 0.25,
            ..Settings::default()
        };
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_first_load_writes_defaults() {
        let path = std::env::temp_dir().join(format!(
            "fearwater_settings_test_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        assert_eq!(Settings::load_from(&path), Settings::default());
        assert!(path.exists());

        let tuned = Settings {
            player_speed: 4.0,
            ..Settings::default()
        };
        tuned.save_to(&path);
        assert_eq!(Settings::load_from(&path), tuned);

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_rejects_wrong_types() {
        assert!(Settings::from_json(r#"{ "player_speed": "fast" }"#).is_err());
    }
}
