//! Player-tunable game settings.
//!
//! Settings are read from a JSON file in the user's config directory.
//! Any field missing from the file keeps its default value. On first run the
//! defaults are written out so players have a file to edit.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<GameConfig>();

    // Load settings on startup
    app.add_systems(Startup, load_game_config);
}

/// Rules and feel of the level that players can override.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Lives at the start of every game.
    pub starting_lives: u32,
    /// Paddle speed in pixels per second.
    pub paddle_speed: f32,
    /// Launch velocity in screen space (x right, y down).
    pub launch_velocity: [f32; 2],
    /// Horizontal speed gained per pixel of distance from the paddle centre.
    pub deflection_factor: f32,
    /// Whether the ball leaves a particle trail.
    pub ball_trail: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            paddle_speed: 600.0,
            launch_velocity: [-75.0, -300.0],
            deflection_factor: 10.0,
            ball_trail: true,
        }
    }
}

impl GameConfig {
    /// Launch velocity converted to world space (y up).
    pub fn launch_velocity_world(&self) -> Vec2 {
        Vec2::new(self.launch_velocity[0], -self.launch_velocity[1])
    }

    /// Parse settings from JSON text.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Render settings as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get the file path for the settings file.
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("breakout").join("config.json"))
    }

    /// Load settings from disk, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            warn!("Could not determine config directory, using default settings");
            return Self::default();
        };

        if !path.exists() {
            info!("No config file found at {:?}, writing default settings", path);
            let config = Self::default();
            config.save();
            return config;
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!("Loaded settings from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk.
    pub fn save(&self) {
        let Some(path) = Self::file_path() else {
            warn!("Could not determine config directory for saving settings");
            return;
        };

        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warn!("Failed to create config directory: {}", e);
            return;
        }

        match self.to_json() {
            Ok(json) => match fs::write(&path, json) {
                Ok(()) => info!("Saved settings to {:?}", path),
                Err(e) => warn!("Failed to write config file: {}", e),
            },
            Err(e) => warn!("Failed to serialize settings: {}", e),
        }
    }
}

fn load_game_config(mut config: ResMut<GameConfig>) {
    *config = GameConfig::load();
    debug!("Game config: {:?}", *config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "starting_lives": 5 }"#).unwrap();
        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.paddle_speed, 600.0);
        assert!(config.ball_trail);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(GameConfig::from_json("{ starting_lives: ").is_err());
        assert!(GameConfig::from_json(r#"{ "starting_lives": "three" }"#).is_err());
    }

    #[test]
    fn test_saved_file_lists_every_setting() {
        let config = GameConfig {
            starting_lives: 7,
            ball_trail: false,
            ..default()
        };
        let json = config.to_json().unwrap();
        for key in [
            "starting_lives",
            "paddle_speed",
            "launch_velocity",
            "deflection_factor",
            "ball_trail",
        ] {
            assert!(json.contains(key), "missing {key} in {json}");
        }
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_launch_velocity_flips_y() {
        let config = GameConfig::default();
        assert_eq!(config.launch_velocity_world(), Vec2::new(-75.0, 300.0));
    }
}
