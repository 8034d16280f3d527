//! Engine error types
//!
//! Arbitration conflicts are not errors: a rejected auto-timer request is a
//! plain `false`. These variants cover invalid input and a stopped engine.

use thiserror::Error;

use crate::state::SessionId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Adjustment must be a whole number of seconds, got {0}")]
    InvalidAdjustment(String),

    #[error("Minutes must be a positive number, got {0}")]
    InvalidMinutes(f64),

    #[error("Warning threshold cannot be negative, got {0}")]
    InvalidWarningThreshold(i64),

    #[error("Unknown observer session: {0}")]
    UnknownSession(SessionId),

    #[error("Timer engine is not running")]
    EngineUnavailable,
}
