//! Auto-timer arbitration
//!
//! An external trigger may take over the clock with its own countdown, which
//! starts after a short delay. Only a question may displace an auto-timer
//! that is already active; a manual request never displaces anything.

use std::time::Duration;
use chrono::Utc;
use tokio::time::Instant;
use tracing::{info, warn};

use super::SyncEngine;
use crate::{
    broadcast::{Audience, ServerEvent},
    error::EngineError,
    questions::QuestionsBoundary,
    state::{ActiveAutoTimer, AutoTimerPriority, AutoTimerSource},
};

/// Delay between accepting an auto-timer and starting the clock
pub const AUTO_START_DELAY: Duration = Duration::from_secs(10);

/// Longest countdown that can be loaded, 24 hours
pub const MAX_COUNTDOWN_SECONDS: i64 = 24 * 60 * 60;

/// Whole seconds for a countdown length. Anything that does not round to
/// `1..=MAX_COUNTDOWN_SECONDS` is rejected.
pub fn minutes_to_seconds(minutes: f64) -> Result<i64, EngineError> {
    if !minutes.is_finite() {
        return Err(EngineError::InvalidMinutes(minutes));
    }
    let seconds = (minutes * 60.0).round();
    if seconds < 1.0 || seconds > MAX_COUNTDOWN_SECONDS as f64 {
        return Err(EngineError::InvalidMinutes(minutes));
    }
    Ok(seconds as i64)
}

impl<Q: QuestionsBoundary> SyncEngine<Q> {
    /// Try to take over the clock. `Ok(false)` means the request lost
    /// arbitration and nothing changed.
    pub fn request_auto_timer(
        &mut self,
        minutes: f64,
        source: AutoTimerSource,
        now: Instant,
    ) -> Result<bool, EngineError> {
        let seconds = minutes_to_seconds(minutes)?;
        let priority = self.state.auto_timer.priority();
        if priority != AutoTimerPriority::None && source != AutoTimerSource::Question {
            warn!(
                "Rejected {:?} auto-timer of {} minutes, {:?} auto-timer already active",
                source, minutes, priority
            );
            return Ok(false);
        }

        if self.state.is_running {
            self.pause(now);
        }
        let auto_timer = &mut self.state.auto_timer;
        auto_timer.pending_start.cancel();
        auto_timer.active = Some(ActiveAutoTimer { source, minutes });
        auto_timer.pending_start.arm(now, AUTO_START_DELAY);
        self.state.time_left = seconds;
        self.state.original_time = seconds;
        info!(
            "Armed {:?} auto-timer of {} minutes, starting in {}s",
            source,
            minutes,
            AUTO_START_DELAY.as_secs()
        );

        self.broadcast_timer(now);
        Ok(true)
    }

    pub(crate) fn on_auto_start(&mut self, at: Instant) {
        let Some(active) = self.state.auto_timer.active else {
            return;
        };
        self.start(at);
        info!("Auto-timer started ({:?}, {} minutes)", active.source, active.minutes);

        let event = ServerEvent::AutoTimerStarted {
            minutes: active.minutes,
            source: active.source,
            priority: active.source.into(),
            timestamp: Utc::now(),
        };
        self.emit(Audience::All, event, at);
    }

    /// Release the auto-timer. The clock keeps whatever run state it has.
    pub fn cancel_auto_timer(&mut self, reason: String, now: Instant) {
        let auto_timer = &mut self.state.auto_timer;
        let was_pending = auto_timer.pending_start.cancel();
        auto_timer.active = None;
        info!("Auto-timer canceled: {} (start pending: {})", reason, was_pending);

        let event = ServerEvent::AutoTimerCanceled { reason, timestamp: Utc::now() };
        self.emit(Audience::All, event, now);
    }

    /// Change the defaults used by question-triggered auto-timers
    pub fn set_auto_timer_config(
        &mut self,
        enabled: bool,
        minutes: u32,
        now: Instant,
    ) -> Result<(), EngineError> {
        minutes_to_seconds(f64::from(minutes))?;
        self.state.auto_timer.enabled = enabled;
        self.state.auto_timer.minutes = minutes;
        info!("Auto-timer config: enabled={}, minutes={}", enabled, minutes);
        self.emit(Audience::All, ServerEvent::AutoTimerConfigUpdate { enabled, minutes }, now);
        Ok(())
    }
}
