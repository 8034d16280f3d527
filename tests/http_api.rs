// Integration tests for the HTTP control surface and event stream

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use stage_clock::{
    config::EngineSettings, create_router, engine::SyncEngine, questions::DisplayedQuestions,
    state::AppState, tasks::spawn_engine,
};

fn app_with(settings: EngineSettings) -> (Router, DisplayedQuestions) {
    let questions = DisplayedQuestions::new();
    let (engine, _task) = spawn_engine(SyncEngine::new(settings, questions.clone()));
    let state = AppState::new(engine, questions.clone(), 20554, "127.0.0.1".to_string());
    (create_router(state), questions)
}

fn app() -> Router {
    app_with(EngineSettings::default()).0
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn health_check() {
    let (status, body) = call(&app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn start_pause_and_reset() {
    let app = app();
    let (status, body) = call(&app, "POST", "/timer/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["isRunning"], true);

    let (_, body) = call(&app, "POST", "/timer/start", None).await;
    assert_eq!(body["message"], "Timer already running");

    let (_, body) = call(&app, "POST", "/timer/pause", None).await;
    assert_eq!(body["state"]["isRunning"], false);

    let (_, body) = call(&app, "POST", "/timer/reset", None).await;
    assert_eq!(body["state"]["timeLeft"], 900);
    assert_eq!(body["state"]["originalTime"], 900);
}

#[tokio::test]
async fn adjust_accepts_whole_seconds_only() {
    let app = app();
    let (status, body) = call(&app, "POST", "/timer/adjust", Some(json!({"seconds": -120}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["timeLeft"], 780);

    for bad in [json!(1.5), json!("ten"), json!(null)] {
        let (status, body) = call(&app, "POST", "/timer/adjust", Some(json!({"seconds": bad}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    let (_, body) = call(&app, "GET", "/state", None).await;
    assert_eq!(body["state"]["timeLeft"], 780);
}

#[tokio::test]
async fn adjust_is_clamped() {
    let app = app();
    let (_, body) = call(&app, "POST", "/timer/adjust", Some(json!({"seconds": -100000}))).await;
    assert_eq!(body["state"]["timeLeft"], -999);
    assert_eq!(body["state"]["status"], "overtime");
}

#[tokio::test]
async fn manual_auto_timer_conflict_is_409() {
    let app = app();
    let request = json!({"minutes": 5, "source": "manual"});
    let (status, body) = call(&app, "POST", "/auto-timer/trigger", Some(request.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["timeLeft"], 300);
    assert_eq!(body["state"]["autoTimer"]["priority"], "manual");
    assert_eq!(body["state"]["autoTimer"]["startsIn"], 10);

    let (status, body) = call(&app, "POST", "/auto-timer/trigger", Some(request)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "rejected");

    let (status, body) = call(&app, "POST", "/auto-timer/cancel", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["autoTimer"]["isActive"], false);
    assert_eq!(body["state"]["autoTimer"]["priority"], "none");
}

#[tokio::test]
async fn invalid_minutes_are_400() {
    let app = app();
    let (status, _) = call(
        &app,
        "POST",
        "/auto-timer/trigger",
        Some(json!({"minutes": -2, "source": "question"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for minutes in [json!(0), json!(0.001), json!(1e18)] {
        let (status, _) = call(&app, "POST", "/timer/set", Some(json!({"minutes": minutes}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // The engine is still serving after the rejected inputs
    call(&app, "POST", "/timer/adjust", Some(json!({"seconds": -100000}))).await;
    let (status, body) = call(&app, "GET", "/state", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["timeLeft"], -999);
    assert_eq!(body["state"]["progress"], 1.0);
}

#[tokio::test]
async fn displaying_a_question_arms_the_auto_timer() {
    let (app, questions) = app_with(EngineSettings {
        auto_timer_enabled: true,
        auto_timer_minutes: 2,
        ..EngineSettings::default()
    });

    let (status, body) = call(&app, "POST", "/questions/q1/display", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(questions.is_displayed("q1"));
    assert_eq!(body["state"]["timeLeft"], 120);
    assert_eq!(body["state"]["autoTimer"]["source"], "question");

    let (_, body) = call(&app, "POST", "/timer/reset", None).await;
    assert_eq!(body["state"]["message"], "");
    assert!(questions.displayed().is_empty());
}

#[tokio::test]
async fn disabled_auto_timer_leaves_clock_alone() {
    let (app, questions) = app_with(EngineSettings::default());
    let (status, body) = call(&app, "POST", "/questions/q9/display", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(questions.is_displayed("q9"));
    assert_eq!(body["state"]["timeLeft"], 900);
    assert_eq!(body["state"]["autoTimer"]["isActive"], false);
}

#[tokio::test]
async fn settings_and_messages_round_trip_through_state() {
    let app = app();
    let (status, _) = call(
        &app,
        "POST",
        "/settings",
        Some(json!({"warningThreshold": 1000, "sound": {"enabled": true}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    call(&app, "POST", "/message", Some(json!({"text": "Q&A next"}))).await;
    call(&app, "POST", "/message/visibility", Some(json!({"visible": true}))).await;
    call(
        &app,
        "POST",
        "/secondary-timer",
        Some(json!({"label": "Room B", "timeLeft": 240, "isRunning": false})),
    )
    .await;

    let (_, body) = call(&app, "GET", "/state", None).await;
    let state = &body["state"];
    assert_eq!(state["status"], "warning");
    assert_eq!(state["settings"]["sound"]["enabled"], true);
    assert_eq!(state["message"], "Q&A next");
    assert_eq!(state["messageVisible"], true);
    assert_eq!(state["secondaryTimer"]["label"], "Room B");
    assert_eq!(body["lastAction"], "secondary-timer");
    assert!(body["lastActionTime"].is_string());
    assert!(body["displayedQuestions"].is_array());

    let (status, _) = call(&app, "POST", "/settings", Some(json!({"warningThreshold": -1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn event_stream_opens_with_full_state() {
    let app = app();
    let request = Request::builder()
        .uri("/events?role=display&name=Stage%20left")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let mut body = response.into_body().into_data_stream();
    let first = body.next().await.unwrap().unwrap();
    let frame = String::from_utf8(first.to_vec()).unwrap();
    assert!(frame.starts_with("event: fullStateUpdate"));
    assert!(frame.contains("\"timeLeft\":900"));

    let (_, state) = call(&app, "GET", "/state", None).await;
    let observers = state["observers"].as_array().unwrap();
    assert_eq!(observers.len(), 1);
    assert_eq!(observers[0]["displayName"], "Stage left");
    assert_eq!(observers[0]["role"], "display");
}
