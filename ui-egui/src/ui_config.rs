// SPDX-License-Identifier: MIT OR Apache-2.0

//! UI configuration: window and board geometry settings

use std::path::Path;

use gomoku_core::ConfigError;
use serde::{Deserialize, Serialize};

/// Complete UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UiConfig {
    pub window: WindowConfig,
    pub board: BoardConfig,
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial window size (width, height)
    pub initial_size: (f32, f32),
    pub min_size: (f32, f32),
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Gomoku".to_string(),
            initial_size: (860.0, 820.0),
            min_size: (480.0, 560.0),
        }
    }
}

/// Board geometry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Logical pixels available to the board; pitch is budget / size
    pub viewport_budget: f32,
    /// Pitch never drops below this
    pub min_pitch: f32,
    /// Pitch never exceeds this
    pub max_pitch: f32,
    /// Stone radius as fraction of pitch
    pub stone_radius_ratio: f32,
    /// Last move marker diameter as fraction of pitch
    pub last_move_marker_ratio: f32,
    pub grid_line_width: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            viewport_budget: 640.0,
            min_pitch: 24.0,
            max_pitch: 48.0,
            stone_radius_ratio: 0.45,
            last_move_marker_ratio: 0.22,
            grid_line_width: 1.0,
        }
    }
}

impl UiConfig {
    /// Load config from file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.board;
        if !(b.min_pitch > 0.0 && b.min_pitch <= b.max_pitch) {
            return Err(ConfigError::Invalid(format!(
                "pitch range {}..={} is empty",
                b.min_pitch, b.max_pitch
            )));
        }
        if b.viewport_budget <= 0.0 {
            return Err(ConfigError::Invalid("viewport_budget must be positive".into()));
        }
        if !(0.0..=0.5).contains(&b.stone_radius_ratio) {
            return Err(ConfigError::Invalid(
                "stone_radius_ratio must be within 0..=0.5".into(),
            ));
        }
        Ok(())
    }
}
