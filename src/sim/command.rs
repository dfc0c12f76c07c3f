//! Remote command vocabulary and dispatch
//!
//! Inbound strings map onto exactly one state mutation each. Anything
//! outside the vocabulary is shown verbatim as an on-screen message.

use serde::{Deserialize, Serialize};

use super::entities;
use super::schedule::TimedEvent;
use super::state::{FloorCollider, GameEvent, GameState};
use crate::secs_to_ticks;

/// Warning shown while the floor is about to turn to lava
pub const LAVA_WARNING_TEXT: &str = "THE FLOOR IS TURNING TO LAVA!";

/// A parsed remote command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteCommand {
    Bomb,
    HighSpeed,
    NormalSpeed,
    LowSpeed,
    LavaOn,
    LavaOff,
    Killbot,
    /// Free text to display
    Message(String),
}

impl RemoteCommand {
    /// Parse a payload (case-sensitive exact match; never fails)
    pub fn parse(text: &str) -> Self {
        match text {
            "BOMB" => RemoteCommand::Bomb,
            "HIGH_SPEED" => RemoteCommand::HighSpeed,
            "NORMAL_SPEED" => RemoteCommand::NormalSpeed,
            "LOW_SPEED" => RemoteCommand::LowSpeed,
            "LAVA_ON" => RemoteCommand::LavaOn,
            "LAVA_OFF" => RemoteCommand::LavaOff,
            "KILLBOT" => RemoteCommand::Killbot,
            other => RemoteCommand::Message(other.to_string()),
        }
    }

    /// Wire form of the command
    pub fn as_str(&self) -> &str {
        match self {
            RemoteCommand::Bomb => "BOMB",
            RemoteCommand::HighSpeed => "HIGH_SPEED",
            RemoteCommand::NormalSpeed => "NORMAL_SPEED",
            RemoteCommand::LowSpeed => "LOW_SPEED",
            RemoteCommand::LavaOn => "LAVA_ON",
            RemoteCommand::LavaOff => "LAVA_OFF",
            RemoteCommand::Killbot => "KILLBOT",
            RemoteCommand::Message(text) => text,
        }
    }
}

impl From<&str> for RemoteCommand {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

/// Apply one command to the game state
pub fn dispatch(state: &mut GameState, command: RemoteCommand) {
    log::debug!("Remote command: {}", command.as_str());
    match command {
        RemoteCommand::Bomb => {
            entities::spawn_bomb(state);
        }
        RemoteCommand::HighSpeed => {
            let speed = state.config.speeds.high;
            set_speed(state, speed);
        }
        RemoteCommand::NormalSpeed => {
            let speed = state.config.speeds.normal;
            set_speed(state, speed);
        }
        RemoteCommand::LowSpeed => {
            let speed = state.config.speeds.low;
            set_speed(state, speed);
        }
        RemoteCommand::LavaOn => request_lava(state),
        RemoteCommand::LavaOff => lava_to_floor(state),
        RemoteCommand::Killbot => {
            entities::spawn_killbot(state);
        }
        RemoteCommand::Message(text) => state.set_message(text),
    }
}

fn set_speed(state: &mut GameState, speed: f32) {
    state.player.speed = speed;
    state.events.push(GameEvent::SpeedChanged { speed });
}

/// Warn now, flip the floor after the configured delay.
/// No-op while lava is active or already on its way.
pub fn request_lava(state: &mut GameState) {
    if state.hazard_active() || state.pending_lava.is_some() {
        log::debug!("Lava already active or pending");
        return;
    }
    let token = state.next_token();
    state.pending_lava = Some(token);
    state.set_message(LAVA_WARNING_TEXT);
    state.scheduler.schedule_once(
        state.time_ticks,
        secs_to_ticks(state.config.lava_delay_secs),
        TimedEvent::LavaOn { token },
    );
    state.events.push(GameEvent::HazardWarning);
}

/// Warning elapsed: install the lethal floor if this request is still live
pub fn floor_to_lava(state: &mut GameState, token: u32) {
    if state.pending_lava != Some(token) {
        log::debug!("Lava request {token} was cancelled");
        return;
    }
    state.pending_lava = None;
    if state.hazard_active() {
        return;
    }
    log::info!("Changing floor to lava!");
    state.floor_collider = FloorCollider::Lava;
    state.terrain.set_floor_texture(state.floor_collider.texture());
    state.set_message("");
    state.events.push(GameEvent::HazardChanged { lava: true });
}

/// Restore the solid floor. Also cancels a lava request still in its
/// warning period.
pub fn lava_to_floor(state: &mut GameState) {
    if state.pending_lava.take().is_some() {
        state.set_message("");
    }
    if !state.hazard_active() {
        return;
    }
    log::info!("Changing floor back to dirt!");
    state.floor_collider = FloorCollider::Solid;
    state.terrain.set_floor_texture(state.floor_collider.texture());
    state.events.push(GameEvent::HazardChanged { lava: false });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::chunk::FloorTexture;

    fn quiet_state() -> GameState {
        let mut config = GameConfig::default();
        config.bomb.spawn_on_start = false;
        GameState::new(config)
    }

    fn fire_lava(state: &mut GameState) {
        let now = state.time_ticks + secs_to_ticks(state.config.lava_delay_secs);
        while let Some(event) = state.scheduler.pop_due(now) {
            if let TimedEvent::LavaOn { token } = event {
                floor_to_lava(state, token);
            }
        }
    }

    fn hazard_changes(state: &mut GameState) -> usize {
        state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::HazardChanged { .. }))
            .count()
    }

    #[test]
    fn test_parse_vocabulary() {
        assert_eq!(RemoteCommand::parse("BOMB"), RemoteCommand::Bomb);
        assert_eq!(RemoteCommand::parse("LAVA_ON"), RemoteCommand::LavaOn);
        assert_eq!(RemoteCommand::parse("KILLBOT"), RemoteCommand::Killbot);
        // Case-sensitive
        assert_eq!(
            RemoteCommand::parse("bomb"),
            RemoteCommand::Message("bomb".to_string())
        );
        assert_eq!(RemoteCommand::from("HIGH_SPEED").as_str(), "HIGH_SPEED");
    }

    #[test]
    fn test_speed_commands_and_message() {
        let mut state = quiet_state();
        dispatch(&mut state, RemoteCommand::parse("HIGH_SPEED"));
        assert_eq!(state.player.speed, 250.0);
        dispatch(&mut state, RemoteCommand::parse("NORMAL_SPEED"));
        assert_eq!(state.player.speed, 150.0);
        dispatch(&mut state, RemoteCommand::parse("LOW_SPEED"));
        assert_eq!(state.player.speed, 50.0);

        dispatch(&mut state, RemoteCommand::parse("NORMAL_SPEED"));
        dispatch(&mut state, RemoteCommand::parse("hello"));
        assert_eq!(state.message, "hello");
        assert_eq!(state.player.speed, 150.0);
    }

    #[test]
    fn test_lava_on_is_delayed() {
        let mut state = quiet_state();
        dispatch(&mut state, RemoteCommand::LavaOn);
        assert!(!state.hazard_active());
        assert_eq!(state.message, LAVA_WARNING_TEXT);

        fire_lava(&mut state);
        assert!(state.hazard_active());
        assert!(state.message.is_empty());
        assert!(state
            .terrain
            .chunks()
            .all(|c| c.floor.texture == FloorTexture::Lava));
    }

    #[test]
    fn test_lava_on_twice_one_transition() {
        let mut state = quiet_state();
        dispatch(&mut state, RemoteCommand::LavaOn);
        dispatch(&mut state, RemoteCommand::LavaOn);
        fire_lava(&mut state);
        dispatch(&mut state, RemoteCommand::LavaOn);
        fire_lava(&mut state);
        assert!(state.hazard_active());
        assert_eq!(hazard_changes(&mut state), 1);
    }

    #[test]
    fn test_lava_off_restores_floor() {
        let mut state = quiet_state();
        dispatch(&mut state, RemoteCommand::LavaOff);
        assert_eq!(hazard_changes(&mut state), 0);

        dispatch(&mut state, RemoteCommand::LavaOn);
        fire_lava(&mut state);
        dispatch(&mut state, RemoteCommand::LavaOff);
        dispatch(&mut state, RemoteCommand::LavaOff);
        assert!(!state.hazard_active());
        assert_eq!(state.floor_collider, FloorCollider::Solid);
        assert!(state
            .terrain
            .chunks()
            .all(|c| c.floor.texture == FloorTexture::Platform));
        assert_eq!(hazard_changes(&mut state), 2);
    }

    #[test]
    fn test_lava_off_cancels_pending() {
        let mut state = quiet_state();
        dispatch(&mut state, RemoteCommand::LavaOn);
        dispatch(&mut state, RemoteCommand::LavaOff);
        assert!(state.message.is_empty());
        fire_lava(&mut state);
        assert!(!state.hazard_active());
    }

    #[test]
    fn test_spawn_commands() {
        let mut state = quiet_state();
        dispatch(&mut state, RemoteCommand::Bomb);
        dispatch(&mut state, RemoteCommand::Killbot);
        assert_eq!(state.bombs.len(), 1);
        assert_eq!(state.killbots.len(), 1);
    }
}
