//! Arena configuration
//!
//! Fixed for the lifetime of a `Simulation`. On the web the player's last
//! choice is remembered in LocalStorage; natively it can come from a JSON file.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Why a configuration was rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive, finite number (got {value})")]
    NonPositiveDimension { name: &'static str, value: f32 },
    #[error("viewport {width}x{height} does not fit in a world of size {world}")]
    ViewportLargerThanWorld { width: f32, height: f32, world: f32 },
    #[error("food_count must be at least 1")]
    EmptyFoodPool,
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Arena crowding presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ArenaPreset {
    Calm,
    #[default]
    Classic,
    Crowded,
}

impl ArenaPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArenaPreset::Calm => "Calm",
            ArenaPreset::Classic => "Classic",
            ArenaPreset::Crowded => "Crowded",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "calm" => Some(ArenaPreset::Calm),
            "classic" | "default" => Some(ArenaPreset::Classic),
            "crowded" => Some(ArenaPreset::Crowded),
            _ => None,
        }
    }

    /// Number of bots for this preset
    pub fn bot_count(&self) -> usize {
        match self {
            ArenaPreset::Calm => 5,
            ArenaPreset::Classic => DEFAULT_BOT_COUNT,
            ArenaPreset::Crowded => 20,
        }
    }

    /// Food pool size for this preset
    pub fn food_count(&self) -> usize {
        match self {
            ArenaPreset::Calm => 60,
            ArenaPreset::Classic => DEFAULT_FOOD_COUNT,
            ArenaPreset::Crowded => 40,
        }
    }
}

/// Arena settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preset the counts were derived from
    pub preset: ArenaPreset,

    // === Geometry ===
    /// Side length of the square world
    pub world_size: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Population ===
    pub food_count: usize,
    pub bot_count: usize,

    // === Identity ===
    /// Name drawn above the player's head
    pub player_name: String,
    /// Fixed RNG seed; hosts pick one per run when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: ArenaPreset::Classic,

            world_size: DEFAULT_WORLD_SIZE,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,

            food_count: DEFAULT_FOOD_COUNT,
            bot_count: DEFAULT_BOT_COUNT,

            player_name: "Player".to_string(),
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a preset (applies preset counts)
    pub fn from_preset(preset: ArenaPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a preset (updates bot and food counts)
    pub fn apply_preset(&mut self, preset: ArenaPreset) {
        self.preset = preset;
        self.bot_count = preset.bot_count();
        self.food_count = preset.food_count();
    }

    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the geometry and population make a playable arena
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("world_size", self.world_size),
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }
        if self.viewport_width > self.world_size || self.viewport_height > self.world_size {
            return Err(ConfigError::ViewportLargerThanWorld {
                width: self.viewport_width,
                height: self.viewport_height,
                world: self.world_size,
            });
        }
        if self.food_count == 0 {
            return Err(ConfigError::EmptyFoodPool);
        }
        Ok(())
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "snake_survival_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}
