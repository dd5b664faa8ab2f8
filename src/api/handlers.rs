//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{controller::Toggled, state::AppState};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Handle POST /toggle - Start the countdown if stopped, stop it if running
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.toggle() {
        Ok((Toggled::Started(_), countdown)) => {
            info!("Toggle endpoint called - countdown running from {}", countdown.display);
            Ok(Json(ApiResponse::running(
                "Countdown started".to_string(),
                countdown,
            )))
        }
        Ok((Toggled::Stopped, countdown)) => {
            info!("Toggle endpoint called - countdown stopped at {}", countdown.display);
            Ok(Json(ApiResponse::stopped(
                "Countdown stopped".to_string(),
                countdown,
            )))
        }
        Err(e) => {
            error!("Failed to toggle countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the countdown and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let countdown = match state.get_countdown() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get countdown state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        countdown,
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
