//! End-of-countdown message and flash
//!
//! Fires once per zero-crossing. Later ticks at or below zero leave the latch
//! alone; only a reset or an adjustment back above zero clears it.

use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

use super::SyncEngine;
use crate::{
    broadcast::{Audience, ServerEvent},
    questions::QuestionsBoundary,
};

pub const END_OF_TIME_MESSAGE: &str = "Time's up!";

/// How long the automatic flash stays on
pub const FLASH_DURATION: Duration = Duration::from_secs(5);

impl<Q: QuestionsBoundary> SyncEngine<Q> {
    pub(crate) fn check_end_of_timer(&mut self, at: Instant) {
        if self.state.time_left != 0 || self.state.flash_sent_for_end {
            return;
        }
        self.state.message = END_OF_TIME_MESSAGE.to_string();
        self.state.message_visible = true;
        self.state.flash_sent_for_end = true;
        info!("Countdown reached zero, showing end-of-time message");

        let message = self.state.message.clone();
        self.emit(Audience::All, ServerEvent::MessageUpdate { message }, at);
        self.emit(Audience::All, ServerEvent::MessageVisibilityUpdate { visible: true }, at);
        self.emit(
            Audience::All,
            ServerEvent::FlashAlert { active: true, is_automatic: true },
            at,
        );
        self.flash_stop.arm(at, FLASH_DURATION);
    }

    pub(crate) fn on_flash_stop(&mut self, at: Instant) {
        self.emit(
            Audience::All,
            ServerEvent::FlashAlert { active: false, is_automatic: true },
            at,
        );
    }

    /// Drop the end-of-time message, re-arm the latch and take questions off display
    pub(crate) fn clear_end_of_timer(&mut self) {
        self.state.message.clear();
        self.state.message_visible = false;
        self.state.flash_sent_for_end = false;
        self.questions.clear_displayed();
    }
}
