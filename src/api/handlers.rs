//! HTTP endpoint handlers
//!
//! Each control route maps 1:1 onto an engine command and answers with the
//! state right after the command was applied.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use super::responses::{
    AdjustRequest, ApiError, ApiResponse, AutoTimerConfigRequest, CancelAutoTimerRequest,
    FlashRequest, HealthResponse, MessageRequest, SetTimeRequest, StatusResponse,
    TriggerAutoTimerRequest, VisibilityRequest,
};
use crate::{
    engine::parse_adjustment,
    state::{AppState, AutoTimerSource, SecondaryTimer, SettingsUpdate},
};

type ApiResult = Result<Json<ApiResponse>, ApiError>;

/// Answer with the post-command state
async fn respond(state: &AppState, action: &str, message: String) -> ApiResult {
    state.record_action(action);
    let snapshot = state.engine.snapshot().await?;
    Ok(Json(ApiResponse::ok(message, snapshot)))
}

/// Handle POST /timer/start
pub async fn start_handler(State(state): State<AppState>) -> ApiResult {
    let started = state.engine.start().await?;
    let message = if started { "Timer started" } else { "Timer already running" };
    respond(&state, "start", message.to_string()).await
}

/// Handle POST /timer/pause
pub async fn pause_handler(State(state): State<AppState>) -> ApiResult {
    let paused = state.engine.pause().await?;
    let message = if paused { "Timer paused" } else { "Timer not running" };
    respond(&state, "pause", message.to_string()).await
}

/// Handle POST /timer/reset
pub async fn reset_handler(State(state): State<AppState>) -> ApiResult {
    state.engine.reset().await?;
    respond(&state, "reset", "Timer reset".to_string()).await
}

/// Handle POST /timer/adjust
pub async fn adjust_handler(
    State(state): State<AppState>,
    Json(request): Json<AdjustRequest>,
) -> ApiResult {
    let seconds = parse_adjustment(&request.seconds).map_err(|e| {
        warn!("Rejected adjustment: {}", e);
        e
    })?;
    state.engine.adjust(seconds).await?;
    respond(&state, "adjust", format!("Timer adjusted by {}s", seconds)).await
}

/// Handle POST /timer/set
pub async fn set_time_handler(
    State(state): State<AppState>,
    Json(request): Json<SetTimeRequest>,
) -> ApiResult {
    state.engine.set_time(request.minutes).await?;
    respond(&state, "set", format!("Timer set to {} minutes", request.minutes)).await
}

/// Handle POST /auto-timer/config
pub async fn auto_timer_config_handler(
    State(state): State<AppState>,
    Json(request): Json<AutoTimerConfigRequest>,
) -> ApiResult {
    state
        .engine
        .set_auto_timer_config(request.enabled, request.minutes)
        .await?;
    respond(&state, "auto-timer-config", "Auto-timer configuration updated".to_string()).await
}

/// Handle POST /auto-timer/trigger
pub async fn trigger_auto_timer_handler(
    State(state): State<AppState>,
    Json(request): Json<TriggerAutoTimerRequest>,
) -> Result<(StatusCode, Json<ApiResponse>), ApiError> {
    let accepted = state
        .engine
        .trigger_auto_timer(request.minutes, request.source)
        .await?;
    let snapshot = state.engine.snapshot().await?;

    if accepted {
        state.record_action("auto-timer-trigger");
        Ok((
            StatusCode::OK,
            Json(ApiResponse::ok(
                format!("Auto-timer of {} minutes armed", request.minutes),
                snapshot,
            )),
        ))
    } else {
        Ok((
            StatusCode::CONFLICT,
            Json(ApiResponse::rejected(
                "Another auto-timer already holds the clock",
                snapshot,
            )),
        ))
    }
}

/// Handle POST /auto-timer/cancel
pub async fn cancel_auto_timer_handler(
    State(state): State<AppState>,
    request: Option<Json<CancelAutoTimerRequest>>,
) -> ApiResult {
    let reason = request
        .and_then(|Json(request)| request.reason)
        .unwrap_or_else(|| "manual".to_string());
    state.engine.cancel_auto_timer(reason.clone()).await?;
    respond(&state, "auto-timer-cancel", format!("Auto-timer canceled: {}", reason)).await
}

/// Handle POST /message
pub async fn message_handler(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> ApiResult {
    state.engine.set_message(request.text).await?;
    respond(&state, "message", "Message updated".to_string()).await
}

/// Handle POST /message/visibility
pub async fn message_visibility_handler(
    State(state): State<AppState>,
    Json(request): Json<VisibilityRequest>,
) -> ApiResult {
    state.engine.set_message_visibility(request.visible).await?;
    let message = if request.visible { "Message shown" } else { "Message hidden" };
    respond(&state, "message-visibility", message.to_string()).await
}

/// Handle POST /flash
pub async fn flash_handler(
    State(state): State<AppState>,
    Json(request): Json<FlashRequest>,
) -> ApiResult {
    state.engine.flash(request.active).await?;
    let message = if request.active { "Flash started" } else { "Flash stopped" };
    respond(&state, "flash", message.to_string()).await
}

/// Handle POST /settings
pub async fn settings_handler(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> ApiResult {
    state.engine.update_settings(update).await?;
    respond(&state, "settings", "Settings updated".to_string()).await
}

/// Handle POST /secondary-timer; a `null` body clears the mirror
pub async fn secondary_timer_handler(
    State(state): State<AppState>,
    Json(secondary_timer): Json<Option<SecondaryTimer>>,
) -> ApiResult {
    let message = match &secondary_timer {
        Some(timer) => format!("Mirroring secondary timer {:?}", timer.label),
        None => "Secondary timer cleared".to_string(),
    };
    state.engine.set_secondary_timer(secondary_timer).await?;
    respond(&state, "secondary-timer", message).await
}

/// Handle POST /questions/:id/display
///
/// Puts a question on display and, when the auto-timer is enabled, asks for a
/// question countdown. A rejected request takes the question back off display.
pub async fn display_question_handler(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse>), ApiError> {
    let newly_displayed = state.questions.mark_displayed(&question_id);
    let config = state.engine.snapshot().await?.auto_timer;

    if config.enabled {
        let accepted = state
            .engine
            .trigger_auto_timer(f64::from(config.minutes), AutoTimerSource::Question)
            .await?;
        if !accepted {
            if newly_displayed {
                state.questions.unmark(&question_id);
            }
            warn!("Question {} refused, auto-timer busy", question_id);
            let snapshot = state.engine.snapshot().await?;
            return Ok((
                StatusCode::CONFLICT,
                Json(ApiResponse::rejected("Auto-timer busy, question not displayed", snapshot)),
            ));
        }
    }

    info!("Question {} displayed", question_id);
    state.record_action("question-display");
    let snapshot = state.engine.snapshot().await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(format!("Question {} displayed", question_id), snapshot)),
    ))
}

/// Handle GET /state - Return current timer state and server metadata
pub async fn status_handler(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let snapshot = state.engine.snapshot().await?;
    let observers = state.engine.observers().await?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        state: snapshot,
        observers,
        displayed_questions: state.questions.displayed(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
