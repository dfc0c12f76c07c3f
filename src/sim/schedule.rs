//! Deferred and repeating effects
//!
//! Replaces platform timers with a queue ordered by fire tick. Events due on
//! the same tick fire in the order they were scheduled. Nothing is ever
//! cancelled: handlers check that their target still exists.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use super::entities::Lane;
use super::pool::EntityId;

/// Effects that fire later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedEvent {
    /// Bomb lifetime expired
    RemoveBomb(EntityId),
    /// Bullet lifetime expired
    RemoveBullet(Lane, EntityId),
    /// A rocket boost window closed
    EndBoost,
    /// Lava warning elapsed; `token` identifies the request
    LavaOn { token: u32 },
    /// Killbots in range fire (repeating)
    KillbotVolley,
    /// Drop a rocket ahead of the player (repeating)
    SpawnPickup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    fire_tick: u64,
    seq: u64,
    /// Repeat interval in ticks
    period: Option<u64>,
    event: TimedEvent,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_tick == other.fire_tick && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the max-heap yields the earliest (tick, seq) first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_tick
            .cmp(&self.fire_tick)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-ordered queue of `(fire_tick, event)`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    queue: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, fire_tick: u64, period: Option<u64>, event: TimedEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            fire_tick,
            seq,
            period,
            event,
        });
    }

    /// Fire `event` once, `delay` ticks after `now`
    pub fn schedule_once(&mut self, now: u64, delay: u64, event: TimedEvent) {
        self.push(now + delay, None, event);
    }

    /// Fire `event` every `period` ticks, first at `now + period`
    pub fn schedule_every(&mut self, now: u64, period: u64, event: TimedEvent) {
        let period = period.max(1);
        self.push(now + period, Some(period), event);
    }

    /// Pop the next event due at or before `now`; repeating events are requeued
    pub fn pop_due(&mut self, now: u64) -> Option<TimedEvent> {
        if self.queue.peek()?.fire_tick > now {
            return None;
        }
        let entry = self.queue.pop()?;
        if let Some(period) = entry.period {
            self.push(entry.fire_tick + period, Some(period), entry.event);
        }
        Some(entry.event)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether any pending entry matches `predicate`
    pub fn any(&self, predicate: impl Fn(&TimedEvent) -> bool) -> bool {
        self.queue.iter().any(|e| predicate(&e.event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler, now: u64) -> Vec<TimedEvent> {
        std::iter::from_fn(|| s.pop_due(now)).collect()
    }

    #[test]
    fn test_fires_in_time_order() {
        let mut s = Scheduler::new();
        s.schedule_once(0, 10, TimedEvent::EndBoost);
        s.schedule_once(0, 5, TimedEvent::RemoveBomb(EntityId(1)));
        assert!(drain(&mut s, 4).is_empty());
        assert_eq!(drain(&mut s, 5), vec![TimedEvent::RemoveBomb(EntityId(1))]);
        assert_eq!(drain(&mut s, 100), vec![TimedEvent::EndBoost]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_same_tick_keeps_insertion_order() {
        let mut s = Scheduler::new();
        s.schedule_once(0, 3, TimedEvent::LavaOn { token: 1 });
        s.schedule_once(0, 3, TimedEvent::EndBoost);
        s.schedule_once(0, 3, TimedEvent::LavaOn { token: 2 });
        assert_eq!(
            drain(&mut s, 3),
            vec![
                TimedEvent::LavaOn { token: 1 },
                TimedEvent::EndBoost,
                TimedEvent::LavaOn { token: 2 },
            ]
        );
    }

    #[test]
    fn test_repeating_event_requeues() {
        let mut s = Scheduler::new();
        s.schedule_every(0, 18, TimedEvent::KillbotVolley);
        let mut fired = 0;
        for now in 0..=60 {
            fired += drain(&mut s, now).len();
        }
        // Ticks 18, 36, 54
        assert_eq!(fired, 3);
        assert_eq!(s.len(), 1);
        assert!(s.any(|e| *e == TimedEvent::KillbotVolley));
    }

    #[test]
    fn test_late_poll_catches_up_repeats() {
        let mut s = Scheduler::new();
        s.schedule_every(0, 10, TimedEvent::SpawnPickup);
        // Polling late fires each missed period once
        assert_eq!(drain(&mut s, 35).len(), 3);
    }
}
