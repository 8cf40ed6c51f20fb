use pond_common::TurtleId;
use std::collections::BTreeMap;
use std::time::Duration;

/// Deferred work scheduled by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Spawn one replacement food.
    RespawnFood,
    /// End the rest of a turtle. Ignored if the turtle is gone or already hunting.
    WakeTurtle(TurtleId),
}

/// Queue of deferred actions ordered by due time.
///
/// Actions due at the same instant fire in the order they were scheduled.
/// There is no cancellation: consumers check liveness when an action fires.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: BTreeMap<(Duration, u64), TimerAction>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, action: TimerAction) {
        self.pending.insert((due, self.next_seq), action);
        self.next_seq += 1;
    }

    /// Remove and return the earliest action due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, TimerAction)> {
        let entry = self.pending.first_entry()?;
        let (due, _) = *entry.key();
        if due > now {
            return None;
        }
        Some((due, entry.remove()))
    }

    /// Due time of the earliest pending action.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Count pending actions matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&TimerAction) -> bool) -> usize {
        self.pending.values().filter(|a| predicate(a)).count()
    }
}
