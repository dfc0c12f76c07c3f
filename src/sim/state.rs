//! Game state and core simulation types
//!
//! Everything a run needs lives in `GameState`; the tick, spawners and
//! command dispatcher are free functions over it.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::chunk::{FloorTexture, generate_chunk};
use super::entities::{self, Bomb, Bullet, Killbot, Lane, Pickup};
use super::map::Terrain;
use super::pool::{EntityId, EntityPool};
use super::random::seeded;
use super::schedule::{Scheduler, TimedEvent};
use crate::config::GameConfig;
use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::{ms_to_ticks, secs_to_ticks};

/// Shown when the player dies
pub const GAME_OVER_TEXT: &str = "GAME OVER!";

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player died; physics frozen, timers keep draining
    GameOver,
}

/// Which floor collider is installed. Exactly one exists at any time, and
/// hazard mode is read from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FloorCollider {
    /// Benign floor the player stands on
    #[default]
    Solid,
    /// Lethal floor
    Lava,
}

impl FloorCollider {
    pub fn is_lethal(&self) -> bool {
        matches!(self, FloorCollider::Lava)
    }

    pub fn texture(&self) -> FloorTexture {
        FloorTexture::for_hazard(self.is_lethal())
    }
}

/// Player appearance, cycled by position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Skin {
    Andre,
    Ilpo,
    Rasse,
}

/// Skins indexed by position band
pub const SKINS: [Skin; 3] = [Skin::Andre, Skin::Ilpo, Skin::Rasse];

impl Skin {
    /// `floor(|x mod 3000| / 1000)` selects the skin
    pub fn for_position(x: f32) -> Self {
        let band = ((x % 3000.0).abs() / 1000.0).floor() as usize;
        SKINS[band.min(SKINS.len() - 1)]
    }

    pub fn asset_key(&self) -> &'static str {
        match self {
            Skin::Andre => "andre",
            Skin::Ilpo => "ilpo",
            Skin::Rasse => "rasse",
        }
    }
}

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Player animation clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Motion {
    Left,
    Right,
    #[default]
    Turn,
}

impl Motion {
    fn clip_prefix(&self) -> &'static str {
        match self {
            Motion::Left => "left",
            Motion::Right => "right",
            Motion::Turn => "turn",
        }
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub skin: Skin,
    pub facing: Facing,
    pub motion: Motion,
    /// Base horizontal speed (set by remote speed commands)
    pub speed: f32,
    /// Rocket boost windows currently open
    pub boosts: u32,
    /// Accumulated horizontal distance
    pub distance: f32,
    /// Red death tint
    pub tinted: bool,
}

impl Player {
    pub fn new(pos: Vec2, config: &GameConfig) -> Self {
        Self {
            body: Body::new(pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
                .with_bounce(config.player_bounce),
            skin: Skin::for_position(pos.x),
            facing: Facing::Right,
            motion: Motion::Turn,
            speed: config.speeds.normal,
            boosts: 0,
            distance: 0.0,
            tinted: false,
        }
    }

    /// Speed after any active rocket boost
    pub fn effective_speed(&self, boost_factor: f32) -> f32 {
        if self.boosts > 0 {
            self.speed * boost_factor
        } else {
            self.speed
        }
    }

    /// Animation clip key, e.g. `left-andre`
    pub fn animation_key(&self) -> String {
        format!("{}-{}", self.motion.clip_prefix(), self.skin.asset_key())
    }
}

/// Notifications for the presentation layer, drained every frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ChunkGenerated { start: f32 },
    BombSpawned(EntityId),
    KillbotSpawned(EntityId),
    BulletFired { lane: Lane, id: EntityId },
    PickupSpawned(EntityId),
    PickupCollected(EntityId),
    BoostEnded,
    SpeedChanged { speed: f32 },
    /// Lava requested; the floor flips after the warning delay
    HazardWarning,
    HazardChanged { lava: bool },
    MessageChanged,
    PlayerDied,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub terrain: Terrain,
    pub floor_collider: FloorCollider,
    /// Token of the lava request waiting out its warning
    pub pending_lava: Option<u32>,
    pub bombs: EntityPool<Bomb>,
    pub killbots: EntityPool<Killbot>,
    pub bullets_left: EntityPool<Bullet>,
    pub bullets_right: EntityPool<Bullet>,
    pub pickups: EntityPool<Pickup>,
    pub scheduler: Scheduler,
    /// On-screen message (empty when none)
    pub message: String,
    /// Distance traveled / 10, rounded
    pub score: u64,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
    next_token: u32,
}

impl GameState {
    /// Start a run: first chunk generated, player mid-screen, repeating
    /// spawners armed
    pub fn new(config: GameConfig) -> Self {
        let mut rng = seeded(config.seed);
        let mut terrain = Terrain::new(config.chunk_size);
        terrain.insert(
            0,
            generate_chunk(
                0.0,
                config.chunk_size,
                &config.platform,
                config.viewport_height,
                FloorTexture::Platform,
                &mut rng,
            ),
        );

        let player = Player::new(
            Vec2::new(config.viewport_width / 2.0, config.viewport_height / 2.0),
            &config,
        );

        let mut scheduler = Scheduler::new();
        scheduler.schedule_every(
            0,
            ms_to_ticks(config.killbot.fire_interval_ms),
            TimedEvent::KillbotVolley,
        );
        scheduler.schedule_every(
            0,
            secs_to_ticks(config.pickup.interval_secs),
            TimedEvent::SpawnPickup,
        );

        let mut state = Self {
            rng,
            time_ticks: 0,
            phase: GamePhase::Playing,
            player,
            terrain,
            floor_collider: FloorCollider::Solid,
            pending_lava: None,
            bombs: EntityPool::new(),
            killbots: EntityPool::new(),
            bullets_left: EntityPool::new(),
            bullets_right: EntityPool::new(),
            pickups: EntityPool::new(),
            scheduler,
            message: String::new(),
            score: 0,
            events: vec![GameEvent::ChunkGenerated { start: 0.0 }],
            next_id: 1,
            next_token: 1,
            config,
        };

        if state.config.bomb.spawn_on_start {
            entities::spawn_bomb(&mut state);
        }

        log::info!("Run started with seed {}", state.config.seed);
        state
    }

    /// Allocate a new entity ID (shared by every pool)
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    /// Allocate a token for a delayed transition
    pub fn next_token(&mut self) -> u32 {
        let token = self.next_token;
        self.next_token += 1;
        token
    }

    pub fn hazard_active(&self) -> bool {
        self.floor_collider.is_lethal()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Bullet pool for a lane
    pub fn bullets(&self, lane: Lane) -> &EntityPool<Bullet> {
        match lane {
            Lane::Left => &self.bullets_left,
            Lane::Right => &self.bullets_right,
        }
    }

    pub fn bullets_mut(&mut self, lane: Lane) -> &mut EntityPool<Bullet> {
        match lane {
            Lane::Left => &mut self.bullets_left,
            Lane::Right => &mut self.bullets_right,
        }
    }

    /// Replace the on-screen message
    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = text.into();
        self.events.push(GameEvent::MessageChanged);
    }

    /// Lose condition: freeze the player, drop any pending lava request and
    /// show the game-over text
    pub fn lose(&mut self) {
        if self.is_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        // A lava request still in its warning dies with the run
        self.pending_lava = None;
        self.player.tinted = true;
        self.player.motion = Motion::Turn;
        self.player.body.vel = Vec2::ZERO;
        self.set_message(GAME_OVER_TEXT);
        self.events.push(GameEvent::PlayerDied);
        log::info!("Game over (score {})", self.score);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
