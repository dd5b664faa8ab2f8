//! Cup Timer - a single-button three-minute countdown
//!
//! This is the main entry point for the cup-timer application.

use std::sync::Arc;
use anyhow::anyhow;
use tokio::net::TcpListener;
use tracing::info;

use cup_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    services::AlarmPlayer,
    tasks::{countdown_tick_task, display_logger_task, TokioTickScheduler},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("cup_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting cup-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, alarm={}",
          config.host, config.port,
          config.alarm_command.as_deref().unwrap_or("terminal bell"));

    // The sound stays loaded for as long as the screen is served
    let alarm = Arc::new(AlarmPlayer::new(config.alarm_command.as_deref()).map_err(|e| anyhow!(e))?);
    alarm.load();

    // Create application state
    let (scheduler, tick_rx) = TokioTickScheduler::new();
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        scheduler,
        alarm.clone(),
    ));

    // Start the tick consumer and display logger background tasks
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_tick_task(tick_state, tick_rx).await;
    });
    let display_state = Arc::clone(&state);
    tokio::spawn(async move {
        display_logger_task(display_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /toggle - Start or stop the countdown");
    info!("  GET  /status - Current display, remaining time and button");
    info!("  GET  /health - Health check");

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

    alarm.release();
    info!("Server shutdown complete");
    Ok(())
}
