//! Game configuration and tuning
//!
//! Persisted as JSON: a file on native, LocalStorage on the web.
//! Every field is defaulted so partial documents are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a configuration document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Platform placement rules for chunk generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Platform width in pixels
    pub size: f32,
    /// Highest platform centre (smallest y)
    pub min_y: i32,
    /// Lowest platform centre (largest y, closer to the floor)
    pub max_y: i32,
    /// Fewest platforms stacked per column
    pub min_amount: u32,
    /// Most platforms stacked per column
    pub max_amount: u32,
}

impl PlatformConfig {
    /// Platform band derived from the viewport height (50% - 90%)
    pub fn for_viewport(height: f32) -> Self {
        Self {
            size: 256.0,
            min_y: (height * 0.5).round() as i32,
            max_y: (height * 0.9).round() as i32,
            min_amount: 1,
            max_amount: 2,
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::for_viewport(GameConfig::DEFAULT_VIEWPORT_HEIGHT)
    }
}

/// Player speed constants selected by remote commands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub high: f32,
    pub normal: f32,
    pub low: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            high: 250.0,
            normal: 150.0,
            low: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BombConfig {
    /// Drop height (y of the bomb centre at spawn)
    pub spawn_height: f32,
    /// Horizontal distance ahead of the player, inclusive range
    pub min_ahead: i32,
    pub max_ahead: i32,
    /// Horizontal launch speed is drawn from [-max, max]
    pub max_horizontal_speed: i32,
    /// Initial downward speed
    pub drop_speed: f32,
    /// Seconds before a bomb is removed; `None` keeps bombs forever
    pub lifetime_secs: Option<f32>,
    /// Drop one bomb when the run starts
    pub spawn_on_start: bool,
}

impl Default for BombConfig {
    fn default() -> Self {
        Self {
            spawn_height: 16.0,
            min_ahead: 200,
            max_ahead: 400,
            max_horizontal_speed: 200,
            drop_speed: 20.0,
            lifetime_secs: Some(10.0),
            spawn_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KillbotConfig {
    /// Spawn distance ahead of the player
    pub offset: f32,
    /// Spawn height (bots fall onto the terrain below)
    pub spawn_height: f32,
    /// Minimum time between volleys
    pub fire_interval_ms: u32,
}

impl Default for KillbotConfig {
    fn default() -> Self {
        Self {
            offset: 600.0,
            spawn_height: 100.0,
            fire_interval_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    /// Travel speed (pixels/s)
    pub speed: f32,
    pub lifetime_ms: u32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            speed: 360.0,
            lifetime_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    /// Seconds between rocket spawns
    pub interval_secs: f32,
    /// Spawn distance ahead of the player
    pub ahead: f32,
    /// Seconds a collected rocket boosts the player
    pub boost_secs: f32,
    /// Speed multiplier while boosted
    pub boost_factor: f32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10.0,
            ahead: 500.0,
            boost_secs: 2.0,
            boost_factor: 2.0,
        }
    }
}

/// Remote command channel settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub url: String,
    /// Sent once when the connection opens
    pub handshake: String,
    /// Inbound messages buffered between frames; extra messages are dropped
    pub queue_capacity: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8080/web-socket".to_string(),
            handshake: "client testi".to_string(),
            queue_capacity: 64,
        }
    }
}

/// Complete game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Run seed for reproducible terrain and spawns
    pub seed: u64,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Width of one generated terrain chunk
    pub chunk_size: f32,
    pub platform: PlatformConfig,
    pub speeds: SpeedConfig,
    /// Upward speed applied on jump
    pub jump_velocity: f32,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Restitution of the player body
    pub player_bounce: f32,
    pub bomb: BombConfig,
    pub killbot: KillbotConfig,
    pub bullet: BulletConfig,
    pub pickup: PickupConfig,
    /// Warning time before the floor turns to lava
    pub lava_delay_secs: f32,
    pub remote: RemoteConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x1A7A,
            viewport_width: Self::DEFAULT_VIEWPORT_WIDTH,
            viewport_height: Self::DEFAULT_VIEWPORT_HEIGHT,
            chunk_size: 2048.0,
            platform: PlatformConfig::default(),
            speeds: SpeedConfig::default(),
            jump_velocity: 330.0,
            gravity: 300.0,
            player_bounce: 0.2,
            bomb: BombConfig::default(),
            killbot: KillbotConfig::default(),
            bullet: BulletConfig::default(),
            pickup: PickupConfig::default(),
            lava_delay_secs: 3.0,
            remote: RemoteConfig::default(),
        }
    }
}

impl GameConfig {
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1024.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 768.0;

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "lava_runner_config";

    /// Half the viewport width (the map extension look-ahead)
    pub fn half_view(&self) -> f32 {
        self.viewport_width / 2.0
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `path` if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::from_path(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e}; using default config");
                Self::default()
            }
        }
    }

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("{e}; ignoring stored config"),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_viewport() {
        let config = GameConfig::default();
        assert_eq!(config.platform.min_y, 384);
        assert_eq!(config.platform.max_y, 691);
        assert_eq!(config.half_view(), 512.0);
        assert_eq!(config.speeds.normal, 150.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "seed": 7, "bomb": { "lifetime_secs": null } }"#)
            .expect("valid json");
        assert_eq!(config.seed, 7);
        assert_eq!(config.bomb.lifetime_secs, None);
        assert_eq!(config.bomb.spawn_height, 16.0);
        assert_eq!(config.chunk_size, 2048.0);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            GameConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = GameConfig::load_or_default(Some(Path::new("/definitely/not/here.json")));
        assert_eq!(config, GameConfig::default());
    }
}
