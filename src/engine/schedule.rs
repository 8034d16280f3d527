//! Named, cancellable deadlines owned by the engine
//!
//! Nothing here spawns tasks. The engine task sleeps until the earliest armed
//! deadline and then asks the engine to fire whatever is due.

use std::time::Duration;
use tokio::time::Instant;

/// One pending callback slot. Arming replaces any previous deadline, so at
/// most one callback of each kind is ever pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.0 = Some(now + delay);
    }

    /// Returns whether something was pending. Safe to call when idle.
    pub fn cancel(&mut self) -> bool {
        self.0.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.0.is_some()
    }

    pub fn due(&self) -> Option<Instant> {
        self.0
    }

    pub fn due_by(&self, now: Instant) -> Option<Instant> {
        self.0.filter(|due| *due <= now)
    }

    /// Time left before firing, rounded up to whole seconds
    pub fn remaining_secs(&self, now: Instant) -> Option<u64> {
        self.0.map(|due| {
            let left = due.saturating_duration_since(now);
            left.as_secs() + u64::from(left.subsec_nanos() > 0)
        })
    }
}

/// Kinds of scheduled callbacks, in the order they fire when due together
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scheduled {
    Tick,
    FlashStop,
    AutoStart,
    Roster,
}
