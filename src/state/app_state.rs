//! Shared state of the HTTP layer

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{engine::EngineHandle, questions::DisplayedQuestions};

/// State handed to every HTTP handler.
///
/// The clock itself is not here: it lives in the engine task and is only
/// reachable through `engine`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Handle to the engine task owning the timer
    pub engine: EngineHandle,
    /// Questions currently on display
    pub questions: DisplayedQuestions,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<(String, DateTime<Utc>)>>>,
}

impl AppState {
    pub fn new(engine: EngineHandle, questions: DisplayedQuestions, port: u16, host: String) -> Self {
        Self {
            engine,
            questions,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
        }
    }

    /// Remember the last control command accepted
    pub fn record_action(&self, action: &str) {
        match self.last_action.lock() {
            Ok(mut last_action) => *last_action = Some((action.to_string(), Utc::now())),
            Err(e) => debug!("Failed to record last action: {}", e),
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|a| a.clone()) {
            Some((action, time)) => (Some(action), Some(time)),
            None => (None, None),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
