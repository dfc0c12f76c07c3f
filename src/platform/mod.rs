//! Presentation ports
//!
//! The simulation never draws or plays anything itself. Front ends
//! implement [`Presenter`] and receive the state plus the events of each
//! frame. Asset names used by the sprite and sound layers live here.

use serde::Serialize;

use crate::sim::{GameEvent, GamePhase, GameState, Killbot};

/// Texture keys
pub mod assets {
    pub const PLATFORM: &str = "platform";
    pub const LAVA: &str = "lava";
    pub const BOMB: &str = "bomb";
    pub const KILLBOT: &str = "killbot";
    pub const ROCKET: &str = "rocket";
    pub const SKINS: [&str; 3] = ["andre", "ilpo", "rasse"];
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player died
    GameOver,
}

impl SoundEffect {
    pub fn asset_key(&self) -> &'static str {
        match self {
            SoundEffect::GameOver => "gameover",
        }
    }
}

/// Sound triggered by an event, if any
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::PlayerDied => Some(SoundEffect::GameOver),
        _ => None,
    }
}

/// Texture and animation clip for a killbot sprite
pub fn killbot_sprite(bot: &Killbot) -> (&'static str, &'static str) {
    (assets::KILLBOT, bot.animation_key())
}

/// Render/audio hook called once per frame
pub trait Presenter {
    fn present(&mut self, state: &GameState, events: &[GameEvent]);
}

/// Headless presenter: reports events through `log`
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_score: u64,
}

impl Presenter for LogPresenter {
    fn present(&mut self, state: &GameState, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::MessageChanged if !state.message.is_empty() => {
                    log::info!("Message: {}", state.message);
                }
                GameEvent::KillbotSpawned(id) => {
                    if let Some(bot) = state.killbots.get(*id) {
                        let (texture, clip) = killbot_sprite(bot);
                        log::info!("Killbot {:?}: {texture}/{clip}", id);
                    }
                }
                GameEvent::HazardChanged { lava } => {
                    log::info!("Floor texture: {}", state.floor_collider.texture().asset_key());
                    log::debug!("Hazard active: {lava}");
                }
                other => log::debug!("{other:?}"),
            }
            if let Some(sound) = sound_for(event) {
                log::info!("Play sound: {}", sound.asset_key());
            }
        }
        if state.score / 100 != self.last_score / 100 {
            log::info!("Score {} ({})", state.score, state.player.animation_key());
        }
        self.last_score = state.score;
    }
}

/// End-of-run report written by the native front end
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub ticks: u64,
    pub score: u64,
    pub game_over: bool,
    pub lava: bool,
    pub world_left: f32,
    pub world_right: f32,
    pub chunks: usize,
    pub bombs: usize,
    pub killbots: usize,
}

impl From<&GameState> for RunSummary {
    fn from(state: &GameState) -> Self {
        Self {
            seed: state.config.seed,
            ticks: state.time_ticks,
            score: state.score,
            game_over: state.phase == GamePhase::GameOver,
            lava: state.hazard_active(),
            world_left: state.terrain.bounds.left,
            world_right: state.terrain.bounds.right,
            chunks: state.terrain.len(),
            bombs: state.bombs.len(),
            killbots: state.killbots.len(),
        }
    }
}
