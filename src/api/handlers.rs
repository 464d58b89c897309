//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, Json,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, error, info};

use crate::{state::AppState, timer::TimerView};
use super::{
    page::INDEX_HTML,
    responses::{ActionResponse, HealthResponse, StatusResponse},
};

/// Turn the outcome of a button action into a response
fn action_response(
    action: &str,
    result: Result<TimerView, String>,
) -> Result<Json<ActionResponse>, StatusCode> {
    match result {
        Ok(view) => {
            info!("{} endpoint called - timer now {} at {}", action, view.primary_label, view.display);
            let message = format!("Timer {:?} at {}", view.phase, view.display).to_lowercase();
            Ok(Json(ActionResponse::new(action, message, view)))
        }
        Err(e) => {
            error!("Failed to apply {} action: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET / - Serve the widget page
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Handle POST /start - Start or restart the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ActionResponse>, StatusCode> {
    action_response("start", state.start())
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ActionResponse>, StatusCode> {
    action_response("pause", state.pause())
}

/// Handle POST /toggle - Primary button: pause while running, otherwise start
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ActionResponse>, StatusCode> {
    action_response("toggle", state.toggle())
}

/// Handle POST /reset - Stop and return to 25:00
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ActionResponse>, StatusCode> {
    action_response("reset", state.reset())
}

/// Handle GET /status - Return the current timer view
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_view() {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to get timer view: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream every timer view change to the page
///
/// The current view is sent first so a freshly loaded page renders at once.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, serde_json::Error>>> {
    debug!("New render subscriber");
    let rx = state.subscribe();

    let views = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first {
            // Sender gone means the widget was unmounted.
            rx.changed().await.ok()?;
        }
        let view = rx.borrow_and_update().clone();
        Some((view, (rx, false)))
    });

    Sse::new(views.map(|view| {
        serde_json::to_string(&view).map(|data| Event::default().event("timer").data(data))
    }))
    .keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
