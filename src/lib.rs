//! Lava Runner - an endless side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, entity pools, timers, remote commands)
//! - `remote`: Inbound remote command queue and its transports
//! - `game`: Fixed-timestep frame driver shared by the web and native front ends
//! - `platform`: Presentation ports (render/audio hooks, asset names)
//! - `config`: Data-driven game tuning

pub mod config;
pub mod game;
pub mod platform;
pub mod remote;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use game::{Controls, Game};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the browser frame callback)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation ticks per second
    pub const TICKS_PER_SEC: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Floor strip height (bottom of every chunk)
    pub const FLOOR_HEIGHT: f32 = 32.0;
    /// Platform sprite height
    pub const PLATFORM_HEIGHT: f32 = 32.0;

    /// Entity sprite sizes
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const BOMB_SIZE: f32 = 14.0;
    pub const BULLET_SIZE: f32 = 14.0;
    pub const KILLBOT_SIZE: f32 = 32.0;
    pub const PICKUP_SIZE: f32 = 24.0;
}

/// Convert a duration in seconds to whole simulation ticks (rounded, never negative)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs * consts::TICKS_PER_SEC).round().max(0.0) as u64
}

/// Convert a duration in milliseconds to whole simulation ticks
#[inline]
pub fn ms_to_ticks(ms: u32) -> u64 {
    secs_to_ticks(ms as f32 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_conversions() {
        assert_eq!(secs_to_ticks(10.0), 600);
        assert_eq!(secs_to_ticks(3.0), 180);
        assert_eq!(ms_to_ticks(300), 18);
        assert_eq!(ms_to_ticks(2000), 120);
        assert_eq!(secs_to_ticks(-1.0), 0);
    }
}
