//! Observer fan-out module
//!
//! Keeps every connected display and console converged on the clock: full
//! snapshots on registration, incremental events afterwards, and a debounced
//! roster of who is connected.

pub mod broadcaster;
pub mod events;
pub mod snapshot;

// Re-export main types
pub use broadcaster::{Audience, StateBroadcaster, ROSTER_DEBOUNCE};
pub use events::ServerEvent;
pub use snapshot::{AutoTimerSummary, FullState};
