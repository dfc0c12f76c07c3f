//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or network dependencies

pub mod body;
pub mod chunk;
pub mod collision;
pub mod command;
pub mod entities;
pub mod map;
pub mod pool;
pub mod random;
pub mod schedule;
pub mod state;
pub mod tick;

pub use body::Body;
pub use chunk::{Chunk, FloorSegment, FloorTexture, Platform, generate_chunk};
pub use collision::{Aabb, Landing, land_on};
pub use command::{LAVA_WARNING_TEXT, RemoteCommand, dispatch};
pub use entities::{Bomb, Bullet, Killbot, Lane, Pickup};
pub use map::{Extension, Terrain, WorldBounds, extend_map};
pub use pool::{Entity, EntityId, EntityPool};
pub use schedule::{Scheduler, TimedEvent};
pub use state::{
    FloorCollider, GAME_OVER_TEXT, GameEvent, GamePhase, GameState, Motion, Player, Skin,
};
pub use tick::{TickInput, tick};
