//! State management module
//!
//! This module contains the timer record, observer sessions, presentation
//! settings and the shared state of the HTTP layer.

pub mod app_state;
pub mod observer;
pub mod settings;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use observer::{ObserverRole, ObserverSession, Registration, SessionId};
pub use settings::{
    DisplaySettings, SecondaryTimer, Settings, SettingsUpdate, SoundSettings, TimelineSettings,
};
pub use timer_state::{
    ActiveAutoTimer, AutoTimer, AutoTimerPriority, AutoTimerSource, TimerState, TimerStatus,
    MIN_TIME_LEFT,
};
