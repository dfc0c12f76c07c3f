//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::command::{RemoteCommand, dispatch, floor_to_lava};
use super::entities::{
    self, Lane, collect_pickup, end_boost, killbot_volley, remove_bomb, remove_bullet,
    settle_on_terrain, spawn_pickup,
};
use super::map::extend_map;
use super::pool::EntityId;
use super::schedule::TimedEvent;
use super::state::{Facing, GameState, Motion, Skin};

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys
    pub left: bool,
    pub right: bool,
    /// Jump (only acts when grounded)
    pub jump: bool,
    /// Remote commands drained since the previous frame
    pub commands: Vec<RemoteCommand>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    // Physics stays frozen after death; text updates and pending removals
    // still go through
    if state.is_over() {
        for command in &input.commands {
            match command {
                RemoteCommand::Message(text) => state.set_message(text.clone()),
                other => log::debug!("Ignoring {} after game over", other.as_str()),
            }
        }
        run_timers(state);
        return;
    }

    for command in &input.commands {
        dispatch(state, command.clone());
    }

    run_timers(state);

    update_player(state, input, dt);
    if state.is_over() {
        return;
    }

    state.score = (state.player.distance / 10.0).round() as u64;

    extend_map(state);

    entities::update_bombs(state, dt);
    entities::update_killbots(state, dt);
    entities::update_bullets(state, dt);

    check_overlaps(state);
}

/// Fire every scheduled event due this tick
pub fn run_timers(state: &mut GameState) {
    let now = state.time_ticks;
    while let Some(event) = state.scheduler.pop_due(now) {
        apply_timed_event(state, event);
    }
}

fn apply_timed_event(state: &mut GameState, event: TimedEvent) {
    match event {
        TimedEvent::RemoveBomb(id) => {
            remove_bomb(state, id);
        }
        TimedEvent::RemoveBullet(lane, id) => {
            remove_bullet(state, lane, id);
        }
        TimedEvent::EndBoost => end_boost(state),
        TimedEvent::LavaOn { token } => floor_to_lava(state, token),
        TimedEvent::KillbotVolley => {
            if !state.is_over() {
                killbot_volley(state);
            }
        }
        TimedEvent::SpawnPickup => {
            if !state.is_over() {
                spawn_pickup(state);
            }
        }
    }
}

/// Skin, horizontal velocity from input, jump, integration and landing.
/// Touching a lava floor ends the run.
fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let boost_factor = state.config.pickup.boost_factor;
    let jump_velocity = state.config.jump_velocity;
    let gravity = state.config.gravity;

    let player = &mut state.player;
    player.skin = Skin::for_position(player.body.pos.x);

    let speed = player.effective_speed(boost_factor);
    if input.left {
        player.body.vel.x = -speed;
        player.motion = Motion::Left;
        player.facing = Facing::Left;
    } else if input.right {
        player.body.vel.x = speed;
        player.motion = Motion::Right;
        player.facing = Facing::Right;
    } else {
        player.body.vel.x = 0.0;
        player.motion = Motion::Turn;
    }

    if input.jump && player.body.grounded {
        player.body.vel.y = -jump_velocity;
    }

    let prev_x = player.body.pos.x;
    let prev_bottom = player.body.integrate(dt, gravity);
    let on_floor = settle_on_terrain(&mut player.body, prev_bottom, &state.terrain);
    player.distance += (player.body.pos.x - prev_x).abs();

    if on_floor && state.floor_collider.is_lethal() {
        state.lose();
    }
}

/// Post-step overlap scan between the player and every pool
fn check_overlaps(state: &mut GameState) {
    let player_box = state.player.body.aabb();

    let bomb_hit = state
        .bombs
        .iter()
        .find(|b| b.body.aabb().overlaps(&player_box))
        .map(|b| b.id);
    if let Some(id) = bomb_hit {
        remove_bomb(state, id);
        state.lose();
        return;
    }

    let bullet_hit = [Lane::Left, Lane::Right].into_iter().find_map(|lane| {
        state
            .bullets(lane)
            .iter()
            .find(|b| b.aabb().overlaps(&player_box))
            .map(|b| (lane, b.id))
    });
    if let Some((lane, id)) = bullet_hit {
        remove_bullet(state, lane, id);
        state.lose();
        return;
    }

    let collected: Vec<EntityId> = state
        .pickups
        .iter()
        .filter(|p| p.aabb().overlaps(&player_box))
        .map(|p| p.id)
        .collect();
    for id in collected {
        collect_pickup(state, id);
    }
}
