//! Timer state structure and status derivation

use serde::{Deserialize, Serialize};

use crate::{config::EngineSettings, engine::Deadline};

/// Lowest value the countdown may reach, in seconds of overtime.
pub const MIN_TIME_LEFT: i64 = -999;

/// Display status of the clock. Always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Normal,
    Warning,
    Danger,
    Overtime,
}

impl TimerStatus {
    pub fn derive(time_left: i64, warning_threshold: i64) -> Self {
        if time_left < 0 {
            TimerStatus::Overtime
        } else if time_left == 0 {
            TimerStatus::Danger
        } else if time_left <= warning_threshold {
            TimerStatus::Warning
        } else {
            TimerStatus::Normal
        }
    }
}

/// Who asked for an auto-timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoTimerSource {
    Question,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoTimerPriority {
    None,
    Question,
    Manual,
}

impl From<AutoTimerSource> for AutoTimerPriority {
    fn from(source: AutoTimerSource) -> Self {
        match source {
            AutoTimerSource::Question => AutoTimerPriority::Question,
            AutoTimerSource::Manual => AutoTimerPriority::Manual,
        }
    }
}

/// An accepted auto-timer request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveAutoTimer {
    pub source: AutoTimerSource,
    pub minutes: f64,
}

/// Auto-timer defaults plus the request currently holding the clock, if any.
///
/// Priority is read off `active`, so it can only be non-`None` while an
/// auto-timer is active.
#[derive(Debug, Clone)]
pub struct AutoTimer {
    pub enabled: bool,
    pub minutes: u32,
    pub active: Option<ActiveAutoTimer>,
    /// Delayed start of the active request
    pub pending_start: Deadline,
}

impl AutoTimer {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn priority(&self) -> AutoTimerPriority {
        self.active
            .map(|active| active.source.into())
            .unwrap_or(AutoTimerPriority::None)
    }
}

/// The single authoritative clock
#[derive(Debug, Clone)]
pub struct TimerState {
    /// Seconds remaining; negative means overtime
    pub time_left: i64,
    /// Seconds set at the last start, reset or auto-timer
    pub original_time: i64,
    pub is_running: bool,
    pub warning_threshold: i64,
    pub message: String,
    pub message_visible: bool,
    /// Set once the end-of-time message and flash have fired for the current zero-crossing
    pub flash_sent_for_end: bool,
    pub auto_timer: AutoTimer,
}

impl TimerState {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            time_left: settings.original_time,
            original_time: settings.original_time,
            is_running: false,
            warning_threshold: settings.warning_threshold,
            message: String::new(),
            message_visible: false,
            flash_sent_for_end: false,
            auto_timer: AutoTimer {
                enabled: settings.auto_timer_enabled,
                minutes: settings.auto_timer_minutes,
                active: None,
                pending_start: Deadline::default(),
            },
        }
    }

    pub fn status(&self) -> TimerStatus {
        TimerStatus::derive(self.time_left, self.warning_threshold)
    }

    /// Fraction of the countdown already consumed, clamped to `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.original_time <= 0 {
            return 1.0;
        }
        let original = self.original_time as f64;
        ((original - self.time_left as f64) / original).clamp(0.0, 1.0)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(&EngineSettings::default())
    }
}
