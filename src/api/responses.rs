//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    broadcast::FullState,
    error::EngineError,
    state::{AutoTimerSource, ObserverSession},
};

/// Response to every control command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub state: FullState,
}

impl ApiResponse {
    pub fn new(status: String, message: String, state: FullState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            state,
        }
    }

    /// Command applied
    pub fn ok(message: impl Into<String>, state: FullState) -> Self {
        Self::new("ok".to_string(), message.into(), state)
    }

    /// Command was valid but lost arbitration
    pub fn rejected(message: impl Into<String>, state: FullState) -> Self {
        Self::new("rejected".to_string(), message.into(), state)
    }
}

/// Error body; the engine state is not included because it may be unreachable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Engine error mapped to an HTTP status
#[derive(Debug)]
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            EngineError::InvalidAdjustment(_)
            | EngineError::InvalidMinutes(_)
            | EngineError::InvalidWarningThreshold(_) => StatusCode::BAD_REQUEST,
            EngineError::UnknownSession(_) => StatusCode::NOT_FOUND,
            EngineError::EngineUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.0.to_string(),
            timestamp: Utc::now(),
        };
        (status, Json(body)).into_response()
    }
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub state: FullState,
    pub observers: Vec<ObserverSession>,
    pub displayed_questions: Vec<String>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Adjustment body. Kept as raw JSON so fractional or non-numeric values
/// are rejected by the engine's own validation.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustRequest {
    pub seconds: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetTimeRequest {
    pub minutes: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutoTimerConfigRequest {
    pub enabled: bool,
    pub minutes: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerAutoTimerRequest {
    pub minutes: f64,
    pub source: AutoTimerSource,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelAutoTimerRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlashRequest {
    pub active: bool,
}
