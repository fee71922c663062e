//! Task Timer - a single-task countdown timer with a persisted history
//!
//! This is the main entry point for the task-timer server.

use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::info;

use task_timer::{
    api::create_router,
    clock::{Clock, MonotonicClock, SystemClock},
    config::{ClockKind, Config},
    history::{FileStore, HistoryStore},
    state::AppState,
    timer::CountdownTimer,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("task_timer={},tower_http=info", config.log_level()))
        .init();

    // Invalid durations fail here, before anything is built
    let settings = config.timer_settings()?;

    info!("Starting task-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={}ms, tick={}ms, data_dir={}",
          config.host, config.port, settings.duration.as_millis(), config.tick_ms,
          config.data_dir.display());

    // Load history once at startup
    let history = Arc::new(Mutex::new(HistoryStore::open(FileStore::new(&config.data_dir)?)));

    let clock: Arc<dyn Clock> = match config.clock {
        ClockKind::System => Arc::new(SystemClock),
        ClockKind::Monotonic => Arc::new(MonotonicClock::new()),
    };
    let timer = CountdownTimer::new(settings, clock, Arc::clone(&history));

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), timer, history));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /timer/start    - Start a countdown ({{\"task\": \"...\"}})");
    info!("  POST   /timer/stop     - Stop the countdown and reset the display");
    info!("  GET    /timer/status   - Current countdown and history count");
    info!("  GET    /timer/events   - Server-sent tick and completion events");
    info!("  GET    /history        - Completed countdowns");
    info!("  POST   /history/reload - Re-read the persisted history");
    info!("  DELETE /history        - Clear the history");
    info!("  GET    /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // In-flight countdowns are not resumed on the next start
    if state.timer.status().is_running() {
        state.timer.stop();
    }

    info!("Server shutdown complete");
    Ok(())
}
