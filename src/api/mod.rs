//! HTTP API module
//!
//! Control routes for operators and automation plus the event stream that
//! display screens and consoles subscribe to.

pub mod handlers;
pub mod responses;
pub mod stream;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;
use stream::events_handler;

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/adjust", post(adjust_handler))
        .route("/timer/set", post(set_time_handler))
        .route("/auto-timer/config", post(auto_timer_config_handler))
        .route("/auto-timer/trigger", post(trigger_auto_timer_handler))
        .route("/auto-timer/cancel", post(cancel_auto_timer_handler))
        .route("/message", post(message_handler))
        .route("/message/visibility", post(message_visibility_handler))
        .route("/flash", post(flash_handler))
        .route("/settings", post(settings_handler))
        .route("/secondary-timer", post(secondary_timer_handler))
        .route("/questions/:question_id/display", post(display_question_handler))
        .route("/events", get(events_handler))
        .route("/state", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
