//! Stage Clock - an authoritative presentation countdown server
//!
//! This is the main entry point for the stage-clock application.

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use stage_clock::{
    api::create_router,
    config::Config,
    engine::SyncEngine,
    questions::DisplayedQuestions,
    state::AppState,
    tasks::spawn_engine,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("stage_clock={},tower_http=info", config.log_level()))
        .init();

    let settings = config.engine_settings();
    info!("Starting stage-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, countdown={}min, warning={}s, auto-timer={} ({}min)",
        config.host,
        config.port,
        config.minutes,
        config.warning,
        config.auto_timer,
        config.auto_timer_minutes
    );

    // The engine task is the only owner of the clock
    let questions = DisplayedQuestions::new();
    let (engine, engine_task) = spawn_engine(SyncEngine::new(settings, questions.clone()));

    let state = AppState::new(engine, questions, config.port, config.host.clone());
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /events?role=admin|display&name=...  - Subscribe to clock events (SSE)");
    info!("  POST /timer/start|pause|reset             - Run control");
    info!("  POST /timer/adjust {{seconds}}              - Add or remove time");
    info!("  POST /auto-timer/trigger {{minutes,source}} - Request an auto-timer");
    info!("  GET  /state                               - Current clock and observers");
    info!("  GET  /health                              - Health check");

    // Setup graceful shutdown
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to listen for signals: {}", e),
            }
        }
    }

    engine_task.abort();
    info!("Server shutdown complete");
    Ok(())
}
