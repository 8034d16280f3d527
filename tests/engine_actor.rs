// Integration tests for the engine task
// Time is paused, so the runtime jumps straight to the next deadline whenever
// every task is idle.

use std::time::Duration;

use stage_clock::{
    config::EngineSettings,
    engine::{EngineHandle, SyncEngine, END_OF_TIME_MESSAGE},
    questions::{DisplayedQuestions, QuestionsBoundary},
    state::{AutoTimerSource, ObserverRole, Registration, SessionId, TimerStatus},
    tasks::spawn_engine,
    EngineError, ServerEvent,
};
use tokio::{sync::mpsc::UnboundedReceiver, time::Instant};

fn settings(original_time: i64, warning_threshold: i64) -> EngineSettings {
    EngineSettings {
        original_time,
        warning_threshold,
        ..EngineSettings::default()
    }
}

fn spawn(original_time: i64, warning_threshold: i64) -> (EngineHandle, DisplayedQuestions) {
    let questions = DisplayedQuestions::new();
    let engine = SyncEngine::new(settings(original_time, warning_threshold), questions.clone());
    let (handle, _task) = spawn_engine(engine);
    (handle, questions)
}

async fn observe(handle: &EngineHandle, role: ObserverRole) -> (SessionId, UnboundedReceiver<ServerEvent>) {
    let (session, mut events) = handle.connect(None).await.unwrap();
    handle
        .register(session, Registration { role, ..Registration::default() })
        .await
        .unwrap();
    match events.recv().await {
        Some(ServerEvent::FullStateUpdate(_)) => {}
        other => panic!("expected a snapshot first, got {:?}", other),
    }
    (session, events)
}

/// Wait for the first event matching `pred`, collecting everything before it
async fn wait_for(
    events: &mut UnboundedReceiver<ServerEvent>,
    pred: impl Fn(&ServerEvent) -> bool,
) -> (ServerEvent, Vec<ServerEvent>) {
    let mut seen = Vec::new();
    while let Some(event) = events.recv().await {
        if pred(&event) {
            return (event, seen);
        }
        seen.push(event);
    }
    panic!("event stream ended, saw {:?}", seen);
}

#[tokio::test(start_paused = true)]
async fn countdown_reaches_warning_then_fires_end_once() {
    let (handle, _questions) = spawn(900, 60);
    let (_session, mut events) = observe(&handle, ObserverRole::Display).await;

    assert!(handle.start().await.unwrap());
    let (warning, _) = wait_for(&mut events, |event| {
        matches!(event, ServerEvent::TimerUpdate { time_left: 60, .. })
    })
    .await;
    assert_eq!(
        warning,
        ServerEvent::TimerUpdate {
            time_left: 60,
            status: TimerStatus::Warning,
            is_running: true,
            auto_start_in: None,
        }
    );

    let (_, before_zero) = wait_for(&mut events, |event| {
        matches!(event, ServerEvent::TimerUpdate { time_left: 0, .. })
    })
    .await;
    let end_of_time: Vec<_> = before_zero
        .into_iter()
        .filter(|event| !matches!(event, ServerEvent::TimerUpdate { .. }))
        .collect();
    assert_eq!(
        end_of_time,
        vec![
            ServerEvent::MessageUpdate { message: END_OF_TIME_MESSAGE.to_string() },
            ServerEvent::MessageVisibilityUpdate { visible: true },
            ServerEvent::FlashAlert { active: true, is_automatic: true },
        ]
    );

    let zero_at = Instant::now();
    let (stop, during_flash) = wait_for(&mut events, |event| {
        matches!(event, ServerEvent::FlashAlert { active: false, .. })
    })
    .await;
    assert_eq!(stop, ServerEvent::FlashAlert { active: false, is_automatic: true });
    assert_eq!(zero_at.elapsed(), Duration::from_secs(5));
    assert!(during_flash
        .iter()
        .all(|event| matches!(event, ServerEvent::TimerUpdate { .. })));

    // Overtime keeps ticking without another end-of-time message
    let (_, overtime) = wait_for(&mut events, |event| {
        matches!(event, ServerEvent::TimerUpdate { time_left: -30, .. })
    })
    .await;
    assert!(overtime
        .iter()
        .all(|event| matches!(event, ServerEvent::TimerUpdate { status: TimerStatus::Overtime, .. })));
}

#[tokio::test(start_paused = true)]
async fn question_auto_timer_starts_after_ten_seconds() {
    let (handle, _questions) = spawn(900, 60);
    let (_session, mut events) = observe(&handle, ObserverRole::Admin).await;

    let armed_at = Instant::now();
    assert!(handle.trigger_auto_timer(3.0, AutoTimerSource::Question).await.unwrap());
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.time_left, 180);
    assert!(!snapshot.is_running);
    assert_eq!(snapshot.auto_timer.starts_in, Some(10));

    let (started, _) = wait_for(&mut events, |event| {
        matches!(event, ServerEvent::AutoTimerStarted { .. })
    })
    .await;
    assert_eq!(armed_at.elapsed(), Duration::from_secs(10));
    match started {
        ServerEvent::AutoTimerStarted { minutes, source, .. } => {
            assert_eq!(minutes, 3.0);
            assert_eq!(source, AutoTimerSource::Question);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(handle.snapshot().await.unwrap().is_running);
}

#[tokio::test(start_paused = true)]
async fn repeated_manual_trigger_is_rejected() {
    let (handle, _questions) = spawn(900, 60);

    assert!(handle.trigger_auto_timer(5.0, AutoTimerSource::Manual).await.unwrap());
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(!handle.trigger_auto_timer(5.0, AutoTimerSource::Manual).await.unwrap());

    // A question still wins
    assert!(handle.trigger_auto_timer(1.0, AutoTimerSource::Question).await.unwrap());
    assert_eq!(handle.snapshot().await.unwrap().time_left, 60);
}

#[tokio::test(start_paused = true)]
async fn reset_clears_message_and_displayed_questions() {
    let (handle, questions) = spawn(120, 30);
    questions.mark_displayed("q-17");
    handle.set_message("Last question").await.unwrap();
    handle.set_message_visibility(true).await.unwrap();

    handle.reset().await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.message, "");
    assert!(!snapshot.message_visible);
    assert_eq!(snapshot.time_left, 120);
    assert!(questions.displayed().is_empty());
}

#[tokio::test(start_paused = true)]
async fn reconnecting_observer_gets_current_state() {
    let (handle, _questions) = spawn(600, 60);
    handle.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(42_500)).await;

    let (session, mut events) = handle.connect(Some("192.168.1.20".into())).await.unwrap();
    handle.register(session, Registration::default()).await.unwrap();
    let expected = handle.snapshot().await.unwrap();

    match events.recv().await {
        Some(ServerEvent::FullStateUpdate(snapshot)) => {
            assert_eq!(*snapshot, expected);
            assert_eq!(snapshot.time_left, 558);
            assert!(snapshot.is_running);
        }
        other => panic!("expected snapshot, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn roster_collapses_connection_bursts() {
    let (handle, _questions) = spawn(600, 60);
    let (admin, mut events) = observe(&handle, ObserverRole::Admin).await;
    let mut displays = Vec::new();
    for _ in 0..3 {
        displays.push(observe(&handle, ObserverRole::Display).await);
    }
    let (dropped, dropped_events) = displays.pop().unwrap();
    drop(dropped_events);
    handle.disconnect(dropped);

    let (roster, before) = wait_for(&mut events, |event| {
        matches!(event, ServerEvent::ConnectedObserversList(_))
    })
    .await;
    assert!(before.is_empty());
    match roster {
        ServerEvent::ConnectedObserversList(sessions) => {
            let ids: Vec<_> = sessions.iter().map(|s| s.id).collect();
            let mut expected = vec![admin];
            expected.extend(displays.iter().map(|(id, _)| *id));
            assert_eq!(ids, expected);
            assert_eq!(sessions[0].role, ObserverRole::Admin);
        }
        other => panic!("unexpected {:?}", other),
    }

    // Exactly one roster for the whole burst
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn invalid_input_is_an_error_not_a_rejection() {
    let (handle, _questions) = spawn(600, 60);
    assert_eq!(
        handle.trigger_auto_timer(0.0, AutoTimerSource::Manual).await,
        Err(EngineError::InvalidMinutes(0.0))
    );
    assert_eq!(
        handle.register(SessionId(999), Registration::default()).await,
        Err(EngineError::UnknownSession(SessionId(999)))
    );
}

#[tokio::test]
async fn stopped_engine_reports_unavailable() {
    let questions = DisplayedQuestions::new();
    let (handle, task) = spawn_engine(SyncEngine::new(settings(60, 10), questions.clone()));
    task.abort();
    let _ = task.await;

    assert_eq!(handle.start().await, Err(EngineError::EngineUnavailable));
    // The boundary is still usable on its own
    questions.clear_displayed();
}
