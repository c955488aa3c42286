//! Game settings and preferences
//!
//! Persisted separately from the leaderboard.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage, StorageError};

/// Storage key of the settings JSON
pub const SETTINGS_KEY: &str = "spaceShooterSettings";
/// Older key holding only the sound flag as "true"/"false"
pub const LEGACY_SOUND_KEY: &str = "spaceShooterSound";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on/off (menu toggle)
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Visual Effects ===
    /// Particle effects (explosions, power-up bursts)
    pub particles: bool,
    /// Scrolling star background
    pub starfield: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            master_volume: 1.0,
            sfx_volume: 1.0,
            particles: true,
            starfield: true,
        }
    }
}

impl Settings {
    /// Flip the sound flag, returning the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Effective gain multiplier for sound effects; 0 when muted
    pub fn effect_gain(&self) -> f32 {
        if !self.sound_enabled {
            return 0.0;
        }
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Load settings. Falls back to the legacy sound flag, then to defaults.
    pub fn load(storage: &dyn Storage) -> Self {
        match persistence::load_json::<Settings>(storage, SETTINGS_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                return settings;
            }
            Ok(None) => {}
            Err(e) => log::warn!("Discarding stored settings: {e}"),
        }

        let mut settings = Self::default();
        if let Ok(Some(flag)) = storage.get_item(LEGACY_SOUND_KEY) {
            settings.sound_enabled = flag == "true";
        }
        log::info!("Using default settings");
        settings
    }

    pub fn save(&self, storage: &dyn Storage) -> Result<(), StorageError> {
        persistence::save_json(storage, SETTINGS_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.sound_enabled);
        assert!(settings.particles);
        assert_eq!(settings.effect_gain(), 1.0);
    }

    #[test]
    fn test_toggle_sound_mutes() {
        let mut settings = Settings::default();
        assert!(!settings.toggle_sound());
        assert_eq!(settings.effect_gain(), 0.0);
        assert!(settings.toggle_sound());
    }

    #[test]
    fn test_gain_combines_volumes() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Default::default()
        };
        assert!((settings.effect_gain() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let storage = MemoryStorage::new();
        let settings = Settings {
            sound_enabled: false,
            starfield: false,
            ..Default::default()
        };
        settings.save(&storage).unwrap();
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let storage = MemoryStorage::new();
        storage
            .set_item(SETTINGS_KEY, r#"{"sound_enabled":false}"#)
            .unwrap();
        let settings = Settings::load(&storage);
        assert!(!settings.sound_enabled);
        assert!(settings.particles);
    }

    #[test]
    fn test_legacy_sound_flag() {
        let storage = MemoryStorage::new();
        storage.set_item(LEGACY_SOUND_KEY, "false").unwrap();
        assert!(!Settings::load(&storage).sound_enabled);
    }

    #[test]
    fn test_malformed_settings_fall_back() {
        let storage = MemoryStorage::new();
        storage.set_item(SETTINGS_KEY, "[1,2").unwrap();
        assert_eq!(Settings::load(&storage), Settings::default());
    }
}
