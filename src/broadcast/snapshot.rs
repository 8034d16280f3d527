//! Full state snapshots for newly registered observers

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::state::{
    AutoTimerPriority, AutoTimerSource, SecondaryTimer, Settings, TimerState, TimerStatus,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTimerSummary {
    pub enabled: bool,
    pub minutes: u32,
    pub is_active: bool,
    pub priority: AutoTimerPriority,
    pub source: Option<AutoTimerSource>,
    /// Seconds until the pending delayed start fires
    pub starts_in: Option<u64>,
}

/// Every externally visible field of the clock at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullState {
    pub time_left: i64,
    pub original_time: i64,
    pub is_running: bool,
    pub status: TimerStatus,
    pub progress: f64,
    pub warning_threshold: i64,
    pub message: String,
    pub message_visible: bool,
    pub settings: Settings,
    pub secondary_timer: Option<SecondaryTimer>,
    pub auto_timer: AutoTimerSummary,
}

impl FullState {
    pub fn compose(
        state: &TimerState,
        settings: &Settings,
        secondary_timer: Option<&SecondaryTimer>,
        now: Instant,
    ) -> Self {
        let auto_timer = &state.auto_timer;
        Self {
            time_left: state.time_left,
            original_time: state.original_time,
            is_running: state.is_running,
            status: state.status(),
            progress: state.progress(),
            warning_threshold: state.warning_threshold,
            message: state.message.clone(),
            message_visible: state.message_visible,
            settings: settings.clone(),
            secondary_timer: secondary_timer.cloned(),
            auto_timer: AutoTimerSummary {
                enabled: auto_timer.enabled,
                minutes: auto_timer.minutes,
                is_active: auto_timer.is_active(),
                priority: auto_timer.priority(),
                source: auto_timer.active.map(|active| active.source),
                starts_in: auto_timer.pending_start.remaining_secs(now),
            },
        }
    }
}
