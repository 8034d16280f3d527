//! Events pushed to observers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::snapshot::FullState;
use crate::state::{
    AutoTimerPriority, AutoTimerSource, ObserverSession, SecondaryTimer, Settings, TimerStatus,
};

/// Every event an observer can receive.
///
/// Serialized as `{"type": "timerUpdate", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    TimerUpdate {
        time_left: i64,
        status: TimerStatus,
        is_running: bool,
        /// Seconds until a pending auto-timer starts the clock
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auto_start_in: Option<u64>,
    },
    TimerStarted {
        time_left: i64,
        status: TimerStatus,
    },
    TimerPaused {
        time_left: i64,
        status: TimerStatus,
    },
    TimerReset {
        time_left: i64,
        original_time: i64,
    },
    MessageUpdate {
        message: String,
    },
    MessageVisibilityUpdate {
        visible: bool,
    },
    FlashAlert {
        active: bool,
        is_automatic: bool,
    },
    AutoTimerStarted {
        minutes: f64,
        source: AutoTimerSource,
        priority: AutoTimerPriority,
        timestamp: DateTime<Utc>,
    },
    AutoTimerCanceled {
        reason: String,
        timestamp: DateTime<Utc>,
    },
    AutoTimerConfigUpdate {
        enabled: bool,
        minutes: u32,
    },
    SettingsUpdate {
        warning_threshold: i64,
        settings: Settings,
    },
    SecondaryTimerUpdate {
        secondary_timer: Option<SecondaryTimer>,
    },
    FullStateUpdate(Box<FullState>),
    ConnectedObserversList(Vec<ObserverSession>),
}

impl ServerEvent {
    /// Wire name of the event, identical to the serialized `type` tag
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::TimerUpdate { .. } => "timerUpdate",
            ServerEvent::TimerStarted { .. } => "timerStarted",
            ServerEvent::TimerPaused { .. } => "timerPaused",
            ServerEvent::TimerReset { .. } => "timerReset",
            ServerEvent::MessageUpdate { .. } => "messageUpdate",
            ServerEvent::MessageVisibilityUpdate { .. } => "messageVisibilityUpdate",
            ServerEvent::FlashAlert { .. } => "flashAlert",
            ServerEvent::AutoTimerStarted { .. } => "autoTimerStarted",
            ServerEvent::AutoTimerCanceled { .. } => "autoTimerCanceled",
            ServerEvent::AutoTimerConfigUpdate { .. } => "autoTimerConfigUpdate",
            ServerEvent::SettingsUpdate { .. } => "settingsUpdate",
            ServerEvent::SecondaryTimerUpdate { .. } => "secondaryTimerUpdate",
            ServerEvent::FullStateUpdate(_) => "fullStateUpdate",
            ServerEvent::ConnectedObserversList(_) => "connectedObserversList",
        }
    }
}
