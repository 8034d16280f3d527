//! Control commands and the async handle that sends them to the engine task

use tokio::{
    sync::{
        mpsc::{self, UnboundedReceiver},
        oneshot,
    },
    time::Instant,
};
use tracing::debug;

use super::SyncEngine;
use crate::{
    broadcast::{FullState, ServerEvent},
    error::EngineError,
    questions::QuestionsBoundary,
    state::{AutoTimerSource, ObserverSession, Registration, SecondaryTimer, SessionId, SettingsUpdate},
};

type Reply<T> = oneshot::Sender<T>;

/// One request to the engine task. Every variant except `Disconnect`
/// carries the channel its answer goes back on.
#[derive(Debug)]
pub enum Command {
    Start { reply: Reply<bool> },
    Pause { reply: Reply<bool> },
    Reset { reply: Reply<()> },
    Adjust { seconds: i64, reply: Reply<()> },
    SetTime { minutes: f64, reply: Reply<Result<(), EngineError>> },
    SetAutoTimerConfig { enabled: bool, minutes: u32, reply: Reply<Result<(), EngineError>> },
    TriggerAutoTimer { minutes: f64, source: AutoTimerSource, reply: Reply<Result<bool, EngineError>> },
    CancelAutoTimer { reason: String, reply: Reply<()> },
    SetMessage { message: String, reply: Reply<()> },
    SetMessageVisibility { visible: bool, reply: Reply<()> },
    Flash { active: bool, reply: Reply<()> },
    UpdateSettings { update: SettingsUpdate, reply: Reply<Result<(), EngineError>> },
    SetSecondaryTimer { secondary_timer: Option<SecondaryTimer>, reply: Reply<()> },
    Connect { address: Option<String>, reply: Reply<(SessionId, UnboundedReceiver<ServerEvent>)> },
    Register { session: SessionId, registration: Registration, reply: Reply<Result<(), EngineError>> },
    RequestState { session: SessionId, reply: Reply<Result<(), EngineError>> },
    Disconnect { session: SessionId },
    Snapshot { reply: Reply<FullState> },
    Observers { reply: Reply<Vec<ObserverSession>> },
}

impl<Q: QuestionsBoundary> SyncEngine<Q> {
    /// Execute one command. The caller may have gone away; replies are best effort.
    pub fn apply(&mut self, command: Command, now: Instant) {
        match command {
            Command::Start { reply } => {
                let _ = reply.send(self.start(now));
            }
            Command::Pause { reply } => {
                let _ = reply.send(self.pause(now));
            }
            Command::Reset { reply } => {
                self.reset(now);
                let _ = reply.send(());
            }
            Command::Adjust { seconds, reply } => {
                self.adjust(seconds, now);
                let _ = reply.send(());
            }
            Command::SetTime { minutes, reply } => {
                let _ = reply.send(self.set_time(minutes, now));
            }
            Command::SetAutoTimerConfig { enabled, minutes, reply } => {
                let _ = reply.send(self.set_auto_timer_config(enabled, minutes, now));
            }
            Command::TriggerAutoTimer { minutes, source, reply } => {
                let _ = reply.send(self.request_auto_timer(minutes, source, now));
            }
            Command::CancelAutoTimer { reason, reply } => {
                self.cancel_auto_timer(reason, now);
                let _ = reply.send(());
            }
            Command::SetMessage { message, reply } => {
                self.set_message(message, now);
                let _ = reply.send(());
            }
            Command::SetMessageVisibility { visible, reply } => {
                self.set_message_visible(visible, now);
                let _ = reply.send(());
            }
            Command::Flash { active, reply } => {
                self.flash(active, now);
                let _ = reply.send(());
            }
            Command::UpdateSettings { update, reply } => {
                let _ = reply.send(self.update_settings(update, now));
            }
            Command::SetSecondaryTimer { secondary_timer, reply } => {
                self.set_secondary_timer(secondary_timer, now);
                let _ = reply.send(());
            }
            Command::Connect { address, reply } => {
                let (session, events) = self.connect(address, now);
                if let Err((session, _)) = reply.send((session, events)) {
                    debug!("Observer {} left before connecting", session);
                    self.disconnect(session, now);
                }
            }
            Command::Register { session, registration, reply } => {
                let _ = reply.send(self.register(session, registration, now));
            }
            Command::RequestState { session, reply } => {
                let _ = reply.send(self.request_state(session, now));
            }
            Command::Disconnect { session } => self.disconnect(session, now),
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot(now));
            }
            Command::Observers { reply } => {
                let _ = reply.send(self.broadcaster().sessions());
            }
        }
    }
}

/// Cloneable handle to the engine task
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
}

impl EngineHandle {
    pub fn new(commands: mpsc::Sender<Command>) -> Self {
        Self { commands }
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T, EngineError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| EngineError::EngineUnavailable)?;
        response.await.map_err(|_| EngineError::EngineUnavailable)
    }

    /// Returns false if the clock was already running
    pub async fn start(&self) -> Result<bool, EngineError> {
        self.request(|reply| Command::Start { reply }).await
    }

    /// Returns false if the clock was not running
    pub async fn pause(&self) -> Result<bool, EngineError> {
        self.request(|reply| Command::Pause { reply }).await
    }

    pub async fn reset(&self) -> Result<(), EngineError> {
        self.request(|reply| Command::Reset { reply }).await
    }

    pub async fn adjust(&self, seconds: i64) -> Result<(), EngineError> {
        self.request(|reply| Command::Adjust { seconds, reply }).await
    }

    pub async fn set_time(&self, minutes: f64) -> Result<(), EngineError> {
        self.request(|reply| Command::SetTime { minutes, reply }).await?
    }

    pub async fn set_auto_timer_config(&self, enabled: bool, minutes: u32) -> Result<(), EngineError> {
        self.request(|reply| Command::SetAutoTimerConfig { enabled, minutes, reply })
            .await?
    }

    /// `Ok(false)` when another auto-timer holds the clock
    pub async fn trigger_auto_timer(
        &self,
        minutes: f64,
        source: AutoTimerSource,
    ) -> Result<bool, EngineError> {
        self.request(|reply| Command::TriggerAutoTimer { minutes, source, reply })
            .await?
    }

    pub async fn cancel_auto_timer(&self, reason: impl Into<String>) -> Result<(), EngineError> {
        let reason = reason.into();
        self.request(|reply| Command::CancelAutoTimer { reason, reply }).await
    }

    pub async fn set_message(&self, message: impl Into<String>) -> Result<(), EngineError> {
        let message = message.into();
        self.request(|reply| Command::SetMessage { message, reply }).await
    }

    pub async fn set_message_visibility(&self, visible: bool) -> Result<(), EngineError> {
        self.request(|reply| Command::SetMessageVisibility { visible, reply }).await
    }

    pub async fn flash(&self, active: bool) -> Result<(), EngineError> {
        self.request(|reply| Command::Flash { active, reply }).await
    }

    pub async fn update_settings(&self, update: SettingsUpdate) -> Result<(), EngineError> {
        self.request(|reply| Command::UpdateSettings { update, reply }).await?
    }

    pub async fn set_secondary_timer(
        &self,
        secondary_timer: Option<SecondaryTimer>,
    ) -> Result<(), EngineError> {
        self.request(|reply| Command::SetSecondaryTimer { secondary_timer, reply })
            .await
    }

    pub async fn connect(
        &self,
        address: Option<String>,
    ) -> Result<(SessionId, UnboundedReceiver<ServerEvent>), EngineError> {
        self.request(|reply| Command::Connect { address, reply }).await
    }

    /// Enrich a session; the full state follows on its event channel
    pub async fn register(
        &self,
        session: SessionId,
        registration: Registration,
    ) -> Result<(), EngineError> {
        self.request(|reply| Command::Register { session, registration, reply })
            .await?
    }

    pub async fn request_state(&self, session: SessionId) -> Result<(), EngineError> {
        self.request(|reply| Command::RequestState { session, reply }).await?
    }

    /// Fire and forget, usable from `Drop`. A lost message is harmless:
    /// the session is pruned on the next send to its closed channel.
    pub fn disconnect(&self, session: SessionId) {
        if self.commands.try_send(Command::Disconnect { session }).is_err() {
            debug!("Could not queue disconnect of observer {}", session);
        }
    }

    pub async fn snapshot(&self) -> Result<FullState, EngineError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn observers(&self) -> Result<Vec<ObserverSession>, EngineError> {
        self.request(|reply| Command::Observers { reply }).await
    }
}
