//! Remote command intake
//!
//! Transports push raw payloads into a bounded queue; the frame driver
//! drains it once per frame. The queue is the only state shared between
//! the network side and the simulation.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use thiserror::Error;

use crate::sim::RemoteCommand;

/// Failures while handing a payload to the game
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("command queue full, dropped {0:?}")]
    QueueFull(String),
    #[error("command queue disconnected")]
    Disconnected,
}

/// Create a bounded command queue holding at most `capacity` payloads
pub fn command_queue(capacity: usize) -> (CommandSender, CommandFeed) {
    let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
    (CommandSender { tx }, CommandFeed { rx })
}

/// Producer half, cloned into each transport
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<RemoteCommand>,
}

impl CommandSender {
    /// Parse and enqueue a payload without blocking
    pub fn push(&self, payload: &str) -> Result<(), RemoteError> {
        match self.tx.try_send(RemoteCommand::parse(payload)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(RemoteError::QueueFull(payload.to_string())),
            Err(TrySendError::Disconnected(_)) => Err(RemoteError::Disconnected),
        }
    }

    /// Enqueue a payload, logging instead of failing
    pub fn deliver(&self, payload: &str) {
        if let Err(e) = self.push(payload) {
            log::warn!("{e}");
        }
    }
}

/// Consumer half, owned by the frame driver
#[derive(Debug)]
pub struct CommandFeed {
    rx: Receiver<RemoteCommand>,
}

impl CommandFeed {
    /// Everything received since the last drain, in arrival order
    pub fn drain(&self) -> Vec<RemoteCommand> {
        self.rx.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let (sender, feed) = command_queue(8);
        sender.push("BOMB").unwrap();
        sender.push("hello").unwrap();
        sender.push("LAVA_ON").unwrap();
        assert_eq!(feed.len(), 3);
        assert_eq!(
            feed.drain(),
            vec![
                RemoteCommand::Bomb,
                RemoteCommand::Message("hello".to_string()),
                RemoteCommand::LavaOn,
            ]
        );
        assert!(feed.is_empty());
    }

    #[test]
    fn test_full_queue_drops() {
        let (sender, feed) = command_queue(2);
        sender.push("BOMB").unwrap();
        sender.push("KILLBOT").unwrap();
        assert_eq!(
            sender.push("LOW_SPEED"),
            Err(RemoteError::QueueFull("LOW_SPEED".to_string()))
        );
        // Logged, not propagated
        sender.deliver("LOW_SPEED");
        assert_eq!(feed.drain().len(), 2);
    }

    #[test]
    fn test_disconnected() {
        let (sender, feed) = command_queue(4);
        drop(feed);
        assert_eq!(sender.push("BOMB"), Err(RemoteError::Disconnected));
    }

    #[test]
    fn test_sender_crosses_threads() {
        let (sender, feed) = command_queue(16);
        let worker = sender.clone();
        std::thread::spawn(move || {
            for _ in 0..4 {
                worker.deliver("BOMB");
            }
        })
        .join()
        .unwrap();
        assert_eq!(feed.drain().len(), 4);
    }
}
