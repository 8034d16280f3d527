//! Observer registry and event fan-out

use std::{collections::BTreeMap, time::Duration};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    time::Instant,
};
use tracing::{debug, info};

use super::events::ServerEvent;
use crate::{
    engine::Deadline,
    error::EngineError,
    state::{ObserverSession, Registration, SessionId},
};

/// Bursts of connects and disconnects within this window produce one roster event.
pub const ROSTER_DEBOUNCE: Duration = Duration::from_millis(500);

/// Which sessions receive an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every session, including the one that caused the change
    All,
    /// Every session except admins, which are the source of settings changes
    NonAdmin,
    Only(SessionId),
}

struct Subscriber {
    session: ObserverSession,
    sender: UnboundedSender<ServerEvent>,
}

impl Subscriber {
    fn accepts(&self, audience: Audience) -> bool {
        match audience {
            Audience::All => true,
            Audience::NonAdmin => !self.session.is_admin(),
            Audience::Only(id) => self.session.id == id,
        }
    }
}

/// Owns every observer session and the channel feeding it
pub struct StateBroadcaster {
    subscribers: BTreeMap<SessionId, Subscriber>,
    next_id: u64,
    roster: Deadline,
}

impl StateBroadcaster {
    pub fn new() -> Self {
        Self {
            subscribers: BTreeMap::new(),
            next_id: 1,
            roster: Deadline::default(),
        }
    }

    /// Create a session for a new connection
    pub fn connect(
        &mut self,
        address: Option<String>,
        now: Instant,
    ) -> (SessionId, UnboundedReceiver<ServerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = SessionId(self.next_id);
        self.next_id += 1;

        info!("Observer {} connected from {:?}", id, address);
        self.subscribers.insert(
            id,
            Subscriber {
                session: ObserverSession::new(id, address),
                sender,
            },
        );
        self.roster.arm(now, ROSTER_DEBOUNCE);
        (id, receiver)
    }

    pub fn register(
        &mut self,
        id: SessionId,
        registration: Registration,
        now: Instant,
    ) -> Result<&ObserverSession, EngineError> {
        let subscriber = self
            .subscribers
            .get_mut(&id)
            .ok_or(EngineError::UnknownSession(id))?;
        subscriber.session.register(registration);
        info!(
            "Observer {} registered as {:?} ({:?})",
            id, subscriber.session.role, subscriber.session.display_name
        );
        self.roster.arm(now, ROSTER_DEBOUNCE);
        Ok(&subscriber.session)
    }

    /// Drop a session. Disconnecting an unknown session is not an error.
    pub fn disconnect(&mut self, id: SessionId, now: Instant) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            info!("Observer {} disconnected", id);
            self.roster.arm(now, ROSTER_DEBOUNCE);
        }
        removed
    }

    /// Deliver an event. Sessions whose receiver is gone are pruned.
    pub fn send(&mut self, audience: Audience, event: ServerEvent, now: Instant) {
        let mut closed = Vec::new();
        for subscriber in self.subscribers.values().filter(|s| s.accepts(audience)) {
            if subscriber.sender.send(event.clone()).is_err() {
                closed.push(subscriber.session.id);
            }
        }
        for id in closed {
            debug!("Pruning closed observer {}", id);
            self.disconnect(id, now);
        }
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.subscribers.contains_key(&id)
    }

    /// Live sessions in connection order
    pub fn sessions(&self) -> Vec<ObserverSession> {
        self.subscribers.values().map(|s| s.session.clone()).collect()
    }

    pub fn roster_deadline(&self) -> Option<Instant> {
        self.roster.due()
    }

    /// Publish the roster if the debounce window has elapsed
    pub fn flush_roster(&mut self, now: Instant) {
        if self.roster.due_by(now).is_none() {
            return;
        }
        self.roster.cancel();
        let roster = self.sessions();
        debug!("Publishing roster of {} observers", roster.len());
        self.send(Audience::All, ServerEvent::ConnectedObserversList(roster), now);
    }
}

impl Default for StateBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
