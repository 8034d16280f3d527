//! Authoritative timer engine
//!
//! `SyncEngine` is the single owner of the clock. It is a plain synchronous
//! state machine: every operation takes the current instant, mutates the
//! timer and emits the matching events before returning, so observers never
//! see an event that disagrees with the state it describes. The engine task
//! in `tasks` drives it from commands and deadlines.

pub mod auto_timer;
pub mod clock;
pub mod commands;
pub mod end_effects;
pub mod schedule;

use tokio::time::Instant;
use tracing::info;

use crate::{
    broadcast::{Audience, FullState, ServerEvent, StateBroadcaster},
    config::EngineSettings,
    error::EngineError,
    questions::QuestionsBoundary,
    state::{Registration, SecondaryTimer, SessionId, Settings, SettingsUpdate, TimerState},
};

pub use auto_timer::{minutes_to_seconds, AUTO_START_DELAY, MAX_COUNTDOWN_SECONDS};
pub use clock::{parse_adjustment, TICK_INTERVAL};
pub use commands::{Command, EngineHandle};
pub use end_effects::{END_OF_TIME_MESSAGE, FLASH_DURATION};
pub use schedule::{Deadline, Scheduled};

pub struct SyncEngine<Q> {
    state: TimerState,
    settings: Settings,
    secondary_timer: Option<SecondaryTimer>,
    tick: Deadline,
    flash_stop: Deadline,
    broadcaster: StateBroadcaster,
    questions: Q,
}

impl<Q: QuestionsBoundary> SyncEngine<Q> {
    pub fn new(settings: EngineSettings, questions: Q) -> Self {
        Self {
            state: TimerState::new(&settings),
            settings: Settings::default(),
            secondary_timer: None,
            tick: Deadline::default(),
            flash_stop: Deadline::default(),
            broadcaster: StateBroadcaster::new(),
            questions,
        }
    }

    /// Read-only view of the clock
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn broadcaster(&self) -> &StateBroadcaster {
        &self.broadcaster
    }

    pub fn snapshot(&self, now: Instant) -> FullState {
        FullState::compose(&self.state, &self.settings, self.secondary_timer.as_ref(), now)
    }

    /// Earliest instant at which some scheduled callback is due
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.tick.due(),
            self.flash_stop.due(),
            self.state.auto_timer.pending_start.due(),
            self.broadcaster.roster_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Run every callback due at or before `now`, oldest first
    pub fn fire_due(&mut self, now: Instant) {
        while let Some((at, kind)) = self.earliest_due(now) {
            match kind {
                Scheduled::Tick => {
                    self.tick.arm(at, TICK_INTERVAL);
                    self.on_tick(at);
                }
                Scheduled::FlashStop => {
                    self.flash_stop.cancel();
                    self.on_flash_stop(at);
                }
                Scheduled::AutoStart => {
                    self.state.auto_timer.pending_start.cancel();
                    self.on_auto_start(at);
                }
                Scheduled::Roster => self.broadcaster.flush_roster(at),
            }
        }
    }

    fn earliest_due(&self, now: Instant) -> Option<(Instant, Scheduled)> {
        [
            (self.tick.due_by(now), Scheduled::Tick),
            (self.flash_stop.due_by(now), Scheduled::FlashStop),
            (self.state.auto_timer.pending_start.due_by(now), Scheduled::AutoStart),
            (self.broadcaster.roster_deadline().filter(|due| *due <= now), Scheduled::Roster),
        ]
        .into_iter()
        .filter_map(|(due, kind)| due.map(|due| (due, kind)))
        .min()
    }

    fn emit(&mut self, audience: Audience, event: ServerEvent, now: Instant) {
        self.broadcaster.send(audience, event, now);
    }

    /// Current time and status, with the auto-start countdown if one is pending
    fn broadcast_timer(&mut self, now: Instant) {
        let event = ServerEvent::TimerUpdate {
            time_left: self.state.time_left,
            status: self.state.status(),
            is_running: self.state.is_running,
            auto_start_in: self.state.auto_timer.pending_start.remaining_secs(now),
        };
        self.emit(Audience::All, event, now);
    }

    pub fn connect(
        &mut self,
        address: Option<String>,
        now: Instant,
    ) -> (SessionId, tokio::sync::mpsc::UnboundedReceiver<ServerEvent>) {
        self.broadcaster.connect(address, now)
    }

    /// Enrich a session and send it the full state
    pub fn register(
        &mut self,
        session: SessionId,
        registration: Registration,
        now: Instant,
    ) -> Result<(), EngineError> {
        self.broadcaster.register(session, registration, now)?;
        self.request_state(session, now)
    }

    pub fn request_state(&mut self, session: SessionId, now: Instant) -> Result<(), EngineError> {
        if !self.broadcaster.contains(session) {
            return Err(EngineError::UnknownSession(session));
        }
        let snapshot = Box::new(self.snapshot(now));
        self.emit(Audience::Only(session), ServerEvent::FullStateUpdate(snapshot), now);
        Ok(())
    }

    pub fn disconnect(&mut self, session: SessionId, now: Instant) {
        self.broadcaster.disconnect(session, now);
    }

    pub fn set_message(&mut self, message: String, now: Instant) {
        info!("Message set to {:?}", message);
        self.state.message = message.clone();
        self.emit(Audience::All, ServerEvent::MessageUpdate { message }, now);
    }

    pub fn set_message_visible(&mut self, visible: bool, now: Instant) {
        info!("Message visibility set to {}", visible);
        self.state.message_visible = visible;
        self.emit(Audience::All, ServerEvent::MessageVisibilityUpdate { visible }, now);
    }

    /// Operator-triggered flash; stopping it also drops a pending automatic stop
    pub fn flash(&mut self, active: bool, now: Instant) {
        info!("Manual flash {}", if active { "on" } else { "off" });
        if !active {
            self.flash_stop.cancel();
        }
        self.emit(
            Audience::All,
            ServerEvent::FlashAlert { active, is_automatic: false },
            now,
        );
    }

    /// Displays follow settings changes; admins made them and are skipped.
    pub fn update_settings(&mut self, update: SettingsUpdate, now: Instant) -> Result<(), EngineError> {
        if let Some(threshold) = update.warning_threshold {
            if threshold < 0 {
                return Err(EngineError::InvalidWarningThreshold(threshold));
            }
            self.state.warning_threshold = threshold;
        }
        self.settings.merge(update);
        info!("Settings updated, warning threshold {}s", self.state.warning_threshold);

        let event = ServerEvent::SettingsUpdate {
            warning_threshold: self.state.warning_threshold,
            settings: self.settings.clone(),
        };
        self.emit(Audience::NonAdmin, event, now);
        self.broadcast_timer(now);
        Ok(())
    }

    pub fn set_secondary_timer(&mut self, secondary_timer: Option<SecondaryTimer>, now: Instant) {
        self.secondary_timer = secondary_timer.clone();
        self.emit(Audience::All, ServerEvent::SecondaryTimerUpdate { secondary_timer }, now);
    }
}
