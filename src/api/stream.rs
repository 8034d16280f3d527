//! Server-sent event stream for observers

use std::net::SocketAddr;
use axum::{
    extract::{ConnectInfo, Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use super::responses::ApiError;
use crate::{
    broadcast::ServerEvent,
    engine::EngineHandle,
    state::{AppState, ObserverRole, Registration, SessionId},
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub role: ObserverRole,
    pub name: Option<String>,
}

/// Receiving end of one session. Dropping it ends the session.
pub struct ObserverFeed {
    engine: EngineHandle,
    session: SessionId,
    events: UnboundedReceiver<ServerEvent>,
}

impl ObserverFeed {
    pub fn new(engine: EngineHandle, session: SessionId, events: UnboundedReceiver<ServerEvent>) -> Self {
        Self { engine, session, events }
    }

    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        self.events.recv().await
    }
}

impl Drop for ObserverFeed {
    fn drop(&mut self) {
        debug!("Observer feed {} closed", self.session);
        self.engine.disconnect(self.session);
    }
}

fn to_sse(event: &ServerEvent) -> Result<Event, axum::Error> {
    Event::default().event(event.name()).json_data(event)
}

/// Handle GET /events - open an observer session.
///
/// The first frame is always the full state.
pub async fn events_handler(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
    remote: Option<ConnectInfo<SocketAddr>>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let address = remote.map(|ConnectInfo(addr)| addr.to_string());
    let (session, events) = state.engine.connect(address).await?;
    let feed = ObserverFeed::new(state.engine.clone(), session, events);

    state
        .engine
        .register(
            session,
            Registration {
                role: query.role,
                display_name: query.name,
                address: None,
            },
        )
        .await?;

    let stream = stream::unfold(feed, |mut feed| async move {
        let event = feed.next_event().await?;
        Some((to_sse(&event), feed))
    });
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
