//! Frame driver
//!
//! Turns variable frame times into fixed simulation steps and feeds remote
//! commands into them. Shared by the browser and native front ends.

use crate::config::GameConfig;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::remote::{CommandFeed, CommandSender, command_queue};
use crate::sim::{GameEvent, GameState, RemoteCommand, TickInput, tick};

/// Held keys for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// A running game and its remote command queue
pub struct Game {
    pub state: GameState,
    feed: CommandFeed,
    sender: CommandSender,
    /// Commands drained but not yet handed to a tick
    pending: Vec<RemoteCommand>,
    accumulator: f32,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let (sender, feed) = command_queue(config.remote.queue_capacity);
        Self {
            state: GameState::new(config),
            feed,
            sender,
            pending: Vec::new(),
            accumulator: 0.0,
        }
    }

    /// Producer handle for transports
    pub fn sender(&self) -> CommandSender {
        self.sender.clone()
    }

    /// Start a fresh run with the same config and a new seed.
    /// The command queue survives.
    pub fn restart(&mut self, seed: u64) {
        let mut config = self.state.config.clone();
        config.seed = seed;
        self.state = GameState::new(config);
        self.pending.clear();
        self.accumulator = 0.0;
    }

    /// Run the simulation ticks covered by `frame_dt` and return the
    /// events they produced
    pub fn update(&mut self, frame_dt: f32, controls: Controls) -> Vec<GameEvent> {
        let dt = frame_dt.clamp(0.0, 0.1);
        self.accumulator += dt;
        self.pending.extend(self.feed.drain());

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                left: controls.left,
                right: controls.right,
                jump: controls.jump,
                commands: std::mem::take(&mut self.pending),
            };
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.state.drain_events()
    }
}
