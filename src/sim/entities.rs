//! Transient entities and their spawners
//!
//! Bombs, killbots, bullets and rocket pickups. Spawning allocates an id,
//! inserts into the entity's pool and schedules any lifetime removal.
//! Removal handlers tolerate the entity already being gone.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::collision::{Aabb, bounce_ceiling, bounce_walls, land_on};
use super::map::Terrain;
use super::pool::{Entity, EntityId};
use super::random::rand_int;
use super::schedule::TimedEvent;
use super::state::{Facing, GameEvent, GameState};
use crate::consts::{BOMB_SIZE, BULLET_SIZE, KILLBOT_SIZE, PICKUP_SIZE};
use crate::{ms_to_ticks, secs_to_ticks};

/// Bullet travel direction; each lane has its own pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Right,
}

impl Lane {
    pub fn sign(&self) -> f32 {
        match self {
            Lane::Left => -1.0,
            Lane::Right => 1.0,
        }
    }

    /// Lane pointing from `from_x` toward `to_x`
    pub fn toward(from_x: f32, to_x: f32) -> Self {
        if to_x < from_x { Lane::Left } else { Lane::Right }
    }
}

/// A bouncing bomb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub id: EntityId,
    pub body: Body,
}

impl Entity for Bomb {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// A turret that shoots at a nearby player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Killbot {
    pub id: EntityId,
    pub body: Body,
    pub facing: Facing,
}

impl Killbot {
    /// Animation clip key
    pub fn animation_key(&self) -> &'static str {
        match self.facing {
            Facing::Left => "bot-left",
            Facing::Right => "bot-right",
        }
    }
}

impl Entity for Killbot {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// A straight-flying bullet (no gravity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: EntityId,
    pub pos: Vec2,
    pub lane: Lane,
}

impl Bullet {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(BULLET_SIZE))
    }
}

impl Entity for Bullet {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// A floating rocket that boosts the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: EntityId,
    pub pos: Vec2,
}

impl Pickup {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(PICKUP_SIZE))
    }
}

impl Entity for Pickup {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Land a falling body on any nearby platform or floor strip.
/// Returns true if it touched a floor strip.
pub fn settle_on_terrain(body: &mut Body, prev_bottom: f32, terrain: &Terrain) -> bool {
    let reach = body.size.x + terrain.chunk_size() / 2.0;
    for platform in terrain.platforms_near(body.pos.x, reach) {
        if land_on(body, prev_bottom, &platform.aabb()).hit {
            return false;
        }
    }
    terrain
        .floors_near(body.pos.x, reach)
        .any(|floor| land_on(body, prev_bottom, &floor.aabb()).hit)
}

// --- Bombs ---

/// Drop a bomb ahead of the player
pub fn spawn_bomb(state: &mut GameState) -> EntityId {
    let cfg = state.config.bomb;
    let ahead = rand_int(&mut state.rng, cfg.min_ahead, cfg.max_ahead) as f32;
    let bounds = state.terrain.bounds;
    let x = (state.player.body.pos.x + state.player.facing.sign() * ahead)
        .clamp(bounds.left + BOMB_SIZE, bounds.right - BOMB_SIZE);
    let vx = rand_int(
        &mut state.rng,
        -cfg.max_horizontal_speed,
        cfg.max_horizontal_speed,
    ) as f32;

    let id = state.next_entity_id();
    let body = Body::new(Vec2::new(x, cfg.spawn_height), Vec2::splat(BOMB_SIZE))
        .with_velocity(Vec2::new(vx, cfg.drop_speed))
        .with_bounce(1.0);
    state.bombs.insert(Bomb { id, body });

    if let Some(lifetime) = cfg.lifetime_secs {
        state.scheduler.schedule_once(
            state.time_ticks,
            secs_to_ticks(lifetime),
            TimedEvent::RemoveBomb(id),
        );
    }
    state.events.push(GameEvent::BombSpawned(id));
    log::debug!("Bomb {:?} dropped at x={x:.0}", id);
    id
}

/// Remove a bomb; no-op if a collision already disposed of it
pub fn remove_bomb(state: &mut GameState, id: EntityId) -> bool {
    let removed = state.bombs.remove(id).is_some();
    if !removed {
        log::debug!("Bomb {:?} already removed", id);
    }
    removed
}

/// Advance bombs: gravity, terrain bounces, world edges
pub fn update_bombs(state: &mut GameState, dt: f32) {
    let gravity = state.config.gravity;
    let bounds = state.terrain.bounds;
    for bomb in state.bombs.iter_mut() {
        let prev_bottom = bomb.body.integrate(dt, gravity);
        settle_on_terrain(&mut bomb.body, prev_bottom, &state.terrain);
        bounce_ceiling(&mut bomb.body);
        bounce_walls(&mut bomb.body, bounds.left, bounds.right);
    }
}

// --- Killbots ---

/// Place a killbot a fixed distance ahead of the player
pub fn spawn_killbot(state: &mut GameState) -> EntityId {
    let cfg = state.config.killbot;
    let player = &state.player;
    let x = player.body.pos.x + player.facing.sign() * cfg.offset;
    let facing = if x > player.body.pos.x {
        Facing::Left
    } else {
        Facing::Right
    };

    let id = state.next_entity_id();
    let body = Body::new(Vec2::new(x, cfg.spawn_height), Vec2::splat(KILLBOT_SIZE));
    state.killbots.insert(Killbot { id, body, facing });
    state.events.push(GameEvent::KillbotSpawned(id));
    log::debug!("Killbot {:?} placed at x={x:.0}", id);
    id
}

/// Killbots fall onto the terrain and stay put
pub fn update_killbots(state: &mut GameState, dt: f32) {
    let gravity = state.config.gravity;
    for bot in state.killbots.iter_mut() {
        let prev_bottom = bot.body.integrate(dt, gravity);
        settle_on_terrain(&mut bot.body, prev_bottom, &state.terrain);
    }
}

/// Every killbot within a quarter viewport of the player turns toward it
/// and fires one bullet at it. Runs on the volley timer, not every frame.
///
/// The bullet lane is the direction from the bot to the player, i.e. the
/// opposite of the player's direction as seen from the bot.
pub fn killbot_volley(state: &mut GameState) -> usize {
    let player_x = state.player.body.pos.x;
    let range = state.config.viewport_width / 4.0;

    let mut shots = Vec::new();
    for bot in state.killbots.iter_mut() {
        let dx = player_x - bot.body.pos.x;
        if dx.abs() > range {
            continue;
        }
        let lane = Lane::toward(bot.body.pos.x, player_x);
        bot.facing = match lane {
            Lane::Left => Facing::Left,
            Lane::Right => Facing::Right,
        };
        let muzzle = bot.body.pos + Vec2::new(lane.sign() * KILLBOT_SIZE / 2.0, 0.0);
        shots.push((muzzle, lane));
    }

    let fired = shots.len();
    for (pos, lane) in shots {
        spawn_bullet(state, pos, lane);
    }
    fired
}

// --- Bullets ---

/// Fire a bullet from `pos` along `lane`
pub fn spawn_bullet(state: &mut GameState, pos: Vec2, lane: Lane) -> EntityId {
    let id = state.next_entity_id();
    state.bullets_mut(lane).insert(Bullet { id, pos, lane });
    state.scheduler.schedule_once(
        state.time_ticks,
        ms_to_ticks(state.config.bullet.lifetime_ms),
        TimedEvent::RemoveBullet(lane, id),
    );
    state.events.push(GameEvent::BulletFired { lane, id });
    id
}

/// Remove a bullet; no-op if it is already gone
pub fn remove_bullet(state: &mut GameState, lane: Lane, id: EntityId) -> bool {
    state.bullets_mut(lane).remove(id).is_some()
}

/// Move every bullet along its lane at constant speed
pub fn update_bullets(state: &mut GameState, dt: f32) {
    let step = state.config.bullet.speed * dt;
    for bullet in state.bullets_left.iter_mut() {
        bullet.pos.x -= step;
    }
    for bullet in state.bullets_right.iter_mut() {
        bullet.pos.x += step;
    }
}

// --- Pickups ---

/// Float a rocket ahead of the player, inside the platform band
pub fn spawn_pickup(state: &mut GameState) -> EntityId {
    let ahead = state.config.pickup.ahead;
    let band = state.config.platform;
    let x = state.player.body.pos.x + state.player.facing.sign() * ahead;
    let y = rand_int(&mut state.rng, band.min_y, band.max_y) as f32 - PICKUP_SIZE * 2.0;

    let id = state.next_entity_id();
    state.pickups.insert(Pickup {
        id,
        pos: Vec2::new(x, y),
    });
    state.events.push(GameEvent::PickupSpawned(id));
    log::debug!("Rocket {:?} at ({x:.0}, {y:.0})", id);
    id
}

/// Consume a rocket: it disappears and the player is boosted for a while
pub fn collect_pickup(state: &mut GameState, id: EntityId) -> bool {
    if state.pickups.remove(id).is_none() {
        return false;
    }
    state.player.boosts += 1;
    state.scheduler.schedule_once(
        state.time_ticks,
        secs_to_ticks(state.config.pickup.boost_secs),
        TimedEvent::EndBoost,
    );
    state.events.push(GameEvent::PickupCollected(id));
    log::debug!("Rocket {:?} collected, boosts open: {}", id, state.player.boosts);
    true
}

/// Close one boost window
pub fn end_boost(state: &mut GameState) {
    state.player.boosts = state.player.boosts.saturating_sub(1);
    if state.player.boosts == 0 {
        state.events.push(GameEvent::BoostEnded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn quiet_state() -> GameState {
        let mut config = GameConfig::default();
        config.bomb.spawn_on_start = false;
        GameState::new(config)
    }

    #[test]
    fn test_bomb_spawn_ahead_and_scheduled() {
        let mut state = quiet_state();
        let id = spawn_bomb(&mut state);
        let bomb = state.bombs.get(id).expect("bomb exists");
        let dx = bomb.body.pos.x - state.player.body.pos.x;
        assert!((200.0..=400.0).contains(&dx));
        assert_eq!(bomb.body.pos.y, 16.0);
        assert!(bomb.body.vel.x.abs() <= 200.0);
        assert_eq!(bomb.body.bounce, 1.0);
        assert!(state.scheduler.any(|e| *e == TimedEvent::RemoveBomb(id)));
    }

    #[test]
    fn test_bomb_without_lifetime() {
        let mut config = GameConfig::default();
        config.bomb.spawn_on_start = false;
        config.bomb.lifetime_secs = None;
        let mut state = GameState::new(config);
        let id = spawn_bomb(&mut state);
        assert!(!state.scheduler.any(|e| *e == TimedEvent::RemoveBomb(id)));
    }

    #[test]
    fn test_remove_bomb_twice() {
        let mut state = quiet_state();
        let id = spawn_bomb(&mut state);
        assert!(remove_bomb(&mut state, id));
        assert!(!remove_bomb(&mut state, id));
    }

    #[test]
    fn test_bombs_bounce_and_stay_in_world() {
        let mut state = quiet_state();
        spawn_bomb(&mut state);
        for _ in 0..600 {
            update_bombs(&mut state, crate::consts::SIM_DT);
        }
        let floor_top = state.config.viewport_height - crate::consts::FLOOR_HEIGHT;
        for bomb in state.bombs.iter() {
            assert!(bomb.body.aabb().bottom() <= floor_top + 0.01);
            assert!(bomb.body.pos.x >= state.terrain.bounds.left);
            assert!(bomb.body.pos.x <= state.terrain.bounds.right);
        }
    }

    #[test]
    fn test_killbot_volley_in_range() {
        let mut state = quiet_state();
        state.config.killbot.offset = 200.0;
        let id = spawn_killbot(&mut state);
        // 200 < 1024 / 4: in range, player is to the left
        assert_eq!(killbot_volley(&mut state), 1);
        assert_eq!(state.bullets_left.len(), 1);
        assert!(state.bullets_right.is_empty());
        let bot = state.killbots.get(id).expect("bot exists");
        assert_eq!(bot.animation_key(), "bot-left");
    }

    #[test]
    fn test_killbot_volley_out_of_range() {
        let mut state = quiet_state();
        spawn_killbot(&mut state);
        // Default offset 600 > 256
        assert_eq!(killbot_volley(&mut state), 0);
        assert!(state.bullets_left.is_empty());
    }

    #[test]
    fn test_killbot_turns_when_player_passes() {
        let mut state = quiet_state();
        state.config.killbot.offset = 100.0;
        let id = spawn_killbot(&mut state);
        state.player.body.pos.x += 250.0;
        killbot_volley(&mut state);
        assert_eq!(state.killbots.get(id).map(|b| b.facing), Some(Facing::Right));
        assert_eq!(state.bullets_right.len(), 1);
    }

    #[test]
    fn test_bullets_move_at_constant_speed() {
        let mut state = quiet_state();
        let left = spawn_bullet(&mut state, Vec2::new(100.0, 100.0), Lane::Left);
        let right = spawn_bullet(&mut state, Vec2::new(100.0, 100.0), Lane::Right);
        update_bullets(&mut state, 0.5);
        assert_eq!(state.bullets_left.get(left).map(|b| b.pos.x), Some(-80.0));
        assert_eq!(state.bullets_right.get(right).map(|b| b.pos.x), Some(280.0));
        assert!(remove_bullet(&mut state, Lane::Left, left));
        assert!(!remove_bullet(&mut state, Lane::Left, left));
    }

    #[test]
    fn test_pickup_boost_window() {
        let mut state = quiet_state();
        let id = spawn_pickup(&mut state);
        assert!(collect_pickup(&mut state, id));
        assert!(!collect_pickup(&mut state, id));
        assert_eq!(state.player.effective_speed(2.0), 300.0);
        end_boost(&mut state);
        assert_eq!(state.player.effective_speed(2.0), 150.0);
        // Extra close is harmless
        end_boost(&mut state);
        assert_eq!(state.player.boosts, 0);
    }

    #[test]
    fn test_killbot_settles_on_terrain() {
        let mut state = quiet_state();
        let id = spawn_killbot(&mut state);
        for _ in 0..600 {
            update_killbots(&mut state, crate::consts::SIM_DT);
        }
        let bot = state.killbots.get(id).expect("bot exists");
        assert!(bot.body.grounded);
        let floor = Aabb::from_center(Vec2::new(bot.body.pos.x, 752.0), Vec2::new(10.0, 32.0));
        assert!(bot.body.aabb().bottom() <= floor.top() + 0.01);
    }
}
