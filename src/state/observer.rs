//! Connected observer sessions

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of one connection. A reconnect always gets a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObserverRole {
    Admin,
    #[default]
    Display,
}

/// Registration message sent by a client after connecting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(default)]
    pub role: ObserverRole,
    pub display_name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserverSession {
    pub id: SessionId,
    pub role: ObserverRole,
    pub display_name: Option<String>,
    pub address: Option<String>,
    pub connected_at: DateTime<Utc>,
}

impl ObserverSession {
    pub fn new(id: SessionId, address: Option<String>) -> Self {
        Self {
            id,
            role: ObserverRole::default(),
            display_name: None,
            address,
            connected_at: Utc::now(),
        }
    }

    /// Enrich the session with what the client told us about itself
    pub fn register(&mut self, registration: Registration) {
        self.role = registration.role;
        if registration.display_name.is_some() {
            self.display_name = registration.display_name;
        }
        if registration.address.is_some() {
            self.address = registration.address;
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ObserverRole::Admin
    }
}
