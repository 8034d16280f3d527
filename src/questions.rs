//! Boundary to the questions subsystem
//!
//! Audience questions are managed elsewhere; the clock only needs to tell that
//! subsystem to take every question off display when the clock is reset or
//! the end-of-time message is cleared.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};
use tracing::{info, warn};

/// Callback into the questions subsystem
pub trait QuestionsBoundary: Send + 'static {
    /// Clear every "currently displayed" flag
    fn clear_displayed(&self);
}

/// In-memory set of displayed question ids, shared with the HTTP layer
#[derive(Debug, Clone, Default)]
pub struct DisplayedQuestions {
    displayed: Arc<Mutex<HashSet<String>>>,
}

impl DisplayedQuestions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a question as displayed. Returns false if it already was.
    pub fn mark_displayed(&self, id: &str) -> bool {
        match self.displayed.lock() {
            Ok(mut displayed) => displayed.insert(id.to_string()),
            Err(e) => {
                warn!("Failed to lock displayed questions: {}", e);
                false
            }
        }
    }

    pub fn unmark(&self, id: &str) {
        if let Ok(mut displayed) = self.displayed.lock() {
            displayed.remove(id);
        }
    }

    pub fn is_displayed(&self, id: &str) -> bool {
        self.displayed
            .lock()
            .map(|displayed| displayed.contains(id))
            .unwrap_or(false)
    }

    /// Displayed question ids in sorted order
    pub fn displayed(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .displayed
            .lock()
            .map(|displayed| displayed.iter().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }
}

impl QuestionsBoundary for DisplayedQuestions {
    fn clear_displayed(&self) {
        match self.displayed.lock() {
            Ok(mut displayed) => {
                if !displayed.is_empty() {
                    info!("Clearing {} displayed questions", displayed.len());
                }
                displayed.clear();
            }
            Err(e) => warn!("Failed to clear displayed questions: {}", e),
        }
    }
}
