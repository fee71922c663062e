//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::state::AppState;
use super::responses::{ApiResponse, HealthResponse, HistoryResponse, StartRequest, StatusResponse};

/// Handle POST /timer/start - Start (or restart) the countdown
///
/// A request without a JSON body starts a countdown for the empty task;
/// a body that is not a valid start request is rejected.
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => StartRequest::default(),
        Err(e) => {
            warn!("Rejected start request: {}", e.body_text());
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let timer = state.start_timer(&request.task);
    info!("Start endpoint called - countdown started for {:?}", request.task);
    Ok(Json(ApiResponse::running(
        format!("Countdown started for {:?}", request.task),
        timer,
    )))
}

/// Handle POST /timer/stop - Cancel the countdown and reset the display
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.stop_timer();
    info!("Stop endpoint called - countdown reset to {}", timer.display);
    Json(ApiResponse::idle("Countdown stopped".to_string(), timer))
}

/// Handle GET /timer/status - Return timer and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.timer.status(),
        history_count: state.history_len(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /timer/events - Stream timer events as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = stream::unfold(state.timer.subscribe(), |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let sse = match Event::default().event(event.name()).json_data(&event) {
                        Ok(sse) => sse,
                        Err(e) => {
                            error!("Failed to encode timer event: {}", e);
                            continue;
                        }
                    };
                    return Some((Ok::<_, Infallible>(sse), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /history - Return the history in append order
pub async fn history_handler(State(state): State<Arc<AppState>>) -> Json<HistoryResponse> {
    Json(HistoryResponse::new(state.history_snapshot()))
}

/// Handle POST /history/reload - Re-read the persisted history
pub async fn reload_history_handler(State(state): State<Arc<AppState>>) -> Json<HistoryResponse> {
    Json(HistoryResponse::new(state.history_load()))
}

/// Handle DELETE /history - Erase the history
pub async fn clear_history_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HistoryResponse>, StatusCode> {
    match state.history_clear() {
        Ok(()) => {
            info!("Clear endpoint called - history erased");
            Ok(Json(HistoryResponse::new(Vec::new())))
        }
        Err(e) => {
            error!("Failed to clear history: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
