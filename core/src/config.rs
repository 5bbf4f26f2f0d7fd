// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session configuration: supported board sizes and search budget

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Color, MAX_BOARD_SIZE};

/// Smallest board on which five in a row is possible
pub const MIN_PLAYABLE_SIZE: u8 = 5;

/// Errors loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for a match session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Smallest selectable board side
    pub min_board_size: u8,
    /// Largest selectable board side
    pub max_board_size: u8,
    /// Board side preselected in the size chooser
    pub default_board_size: u8,
    /// Depth passed to the decision service with every request
    pub search_depth: u32,
    /// Color preselected for the human player
    pub default_human_color: Color,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_board_size: 9,
            max_board_size: 19,
            default_board_size: 15,
            search_depth: 3,
            default_human_color: Color::Black,
        }
    }
}

impl SessionConfig {
    /// Load config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_board_size < MIN_PLAYABLE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "min_board_size {} is below {}",
                self.min_board_size, MIN_PLAYABLE_SIZE
            )));
        }
        if self.max_board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::Invalid(format!(
                "max_board_size {} exceeds {}",
                self.max_board_size, MAX_BOARD_SIZE
            )));
        }
        if !(self.min_board_size..=self.max_board_size).contains(&self.default_board_size) {
            return Err(ConfigError::Invalid(format!(
                "default_board_size {} outside {}..={}",
                self.default_board_size, self.min_board_size, self.max_board_size
            )));
        }
        if self.search_depth == 0 {
            return Err(ConfigError::Invalid("search_depth must be at least 1".into()));
        }
        Ok(())
    }

    /// Whether `size` is a selectable board side
    pub fn accepts_size(&self, size: u8) -> bool {
        (self.min_board_size..=self.max_board_size).contains(&size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = SessionConfig::default();
        config.validate().unwrap();
        assert!(config.accepts_size(9));
        assert!(config.accepts_size(19));
        assert!(!config.accepts_size(8));
        assert!(!config.accepts_size(20));
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"search_depth": 2}"#).unwrap();
        assert_eq!(config.search_depth, 2);
        assert_eq!(config.max_board_size, 19);
    }

    #[test]
    fn rejects_inverted_range() {
        let config = SessionConfig {
            min_board_size: 15,
            max_board_size: 9,
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let config = SessionConfig {
            default_board_size: 13,
            default_human_color: Color::White,
            ..SessionConfig::default()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(SessionConfig::load_from_file(&path).unwrap(), config);
    }
}
