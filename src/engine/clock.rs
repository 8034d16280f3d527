//! Run, pause, reset and adjust transitions of the clock

use std::time::Duration;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info};

use super::{minutes_to_seconds, SyncEngine};
use crate::{
    broadcast::{Audience, ServerEvent},
    error::EngineError,
    questions::QuestionsBoundary,
    state::MIN_TIME_LEFT,
};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Validate an adjustment coming from outside. Only whole numbers of seconds
/// are accepted; `5.0` counts, `5.5`, strings and nulls do not.
pub fn parse_adjustment(value: &Value) -> Result<i64, EngineError> {
    let reject = || EngineError::InvalidAdjustment(value.to_string());
    match value {
        Value::Number(number) => {
            if let Some(seconds) = number.as_i64() {
                return Ok(seconds);
            }
            match number.as_f64() {
                Some(seconds)
                    if seconds.fract() == 0.0
                        && seconds >= i64::MIN as f64
                        && seconds <= i64::MAX as f64 =>
                {
                    Ok(seconds as i64)
                }
                _ => Err(reject()),
            }
        }
        _ => Err(reject()),
    }
}

impl<Q: QuestionsBoundary> SyncEngine<Q> {
    /// Returns false if the clock was already running
    pub fn start(&mut self, now: Instant) -> bool {
        if self.state.is_running {
            debug!("Start ignored, timer already running");
            return false;
        }
        self.state.is_running = true;
        self.tick.arm(now, TICK_INTERVAL);
        info!("Timer started at {}s", self.state.time_left);

        let event = ServerEvent::TimerStarted {
            time_left: self.state.time_left,
            status: self.state.status(),
        };
        self.emit(Audience::All, event, now);
        self.broadcast_timer(now);
        true
    }

    /// Returns false if the clock was not running
    pub fn pause(&mut self, now: Instant) -> bool {
        if !self.state.is_running {
            debug!("Pause ignored, timer not running");
            return false;
        }
        self.tick.cancel();
        self.state.is_running = false;
        info!("Timer paused at {}s", self.state.time_left);

        let event = ServerEvent::TimerPaused {
            time_left: self.state.time_left,
            status: self.state.status(),
        };
        self.emit(Audience::All, event, now);
        true
    }

    pub fn reset(&mut self, now: Instant) {
        self.tick.cancel();
        self.state.is_running = false;
        self.state.time_left = self.state.original_time;
        self.clear_end_of_timer();
        info!("Timer reset to {}s", self.state.original_time);

        let event = ServerEvent::TimerReset {
            time_left: self.state.time_left,
            original_time: self.state.original_time,
        };
        self.emit(Audience::All, event, now);
        let snapshot = Box::new(self.snapshot(now));
        self.emit(Audience::All, ServerEvent::FullStateUpdate(snapshot), now);
    }

    /// Shift the remaining time. The result never drops below `MIN_TIME_LEFT`.
    ///
    /// Moving from zero or overtime back above zero clears the end-of-time
    /// message and re-arms it for the next zero-crossing.
    pub fn adjust(&mut self, delta_seconds: i64, now: Instant) {
        let before = self.state.time_left;
        let after = before.saturating_add(delta_seconds).max(MIN_TIME_LEFT);
        self.state.time_left = after;
        info!("Timer adjusted by {}s: {}s -> {}s", delta_seconds, before, after);

        if before <= 0 && after > 0 {
            self.clear_end_of_timer();
            self.emit(Audience::All, ServerEvent::MessageUpdate { message: String::new() }, now);
            self.emit(Audience::All, ServerEvent::MessageVisibilityUpdate { visible: false }, now);
        }
        self.broadcast_timer(now);
    }

    /// Load a new countdown length without touching the run state
    pub fn set_time(&mut self, minutes: f64, now: Instant) -> Result<(), EngineError> {
        let seconds = minutes_to_seconds(minutes)?;
        self.state.time_left = seconds;
        self.state.original_time = seconds;
        info!("Timer set to {}s", seconds);
        self.broadcast_timer(now);
        Ok(())
    }

    pub(crate) fn on_tick(&mut self, at: Instant) {
        self.state.time_left = (self.state.time_left - 1).max(MIN_TIME_LEFT);
        debug!("Tick: {}s ({:?})", self.state.time_left, self.state.status());
        self.check_end_of_timer(at);
        self.broadcast_timer(at);
    }
}
