//! HTTP API module
//! 
//! This module serves the widget page, its button actions and the render stream.

pub mod handlers;
pub mod page;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/toggle", post(toggle_handler))
        .route("/reset", post(reset_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn call(app: Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn call_json(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let (status, body) = call(app, method, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn toggle_starts_then_pauses() {
        let state = AppState::mount();
        let app = create_router(Arc::clone(&state));

        let (status, json) = call_json(app.clone(), "POST", "/toggle").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["action"], "toggle");
        assert_eq!(json["timer"]["primary_label"], "Pause");
        assert_eq!(json["timer"]["is_running"], true);

        let (_, json) = call_json(app, "POST", "/toggle").await;
        assert_eq!(json["timer"]["primary_label"], "Start");
        assert_eq!(json["timer"]["phase"], "idle");
        assert!(!state.is_ticking().unwrap());
    }

    #[tokio::test]
    async fn reset_reports_full_duration() {
        let state = AppState::mount();
        let app = create_router(Arc::clone(&state));

        call_json(app.clone(), "POST", "/start").await;
        let (status, json) = call_json(app.clone(), "POST", "/reset").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["timer"]["display"], "25:00");
        assert_eq!(json["timer"]["remaining_ms"], 1_500_000);
        assert_eq!(json["timer"]["is_running"], false);

        let (_, status_json) = call_json(app, "GET", "/status").await;
        assert_eq!(status_json["last_action"], "reset");
        assert_eq!(status_json["timer"]["primary_label"], "Start");
    }

    #[tokio::test]
    async fn pause_on_idle_is_harmless() {
        let app = create_router(AppState::mount());
        let (status, json) = call_json(app, "POST", "/pause").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["timer"]["display"], "25:00");
        assert_eq!(json["timer"]["is_running"], false);
    }

    #[tokio::test]
    async fn serves_widget_page_and_health() {
        let app = create_router(AppState::mount());

        let (status, body) = call(app.clone(), "GET", "/").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("id=\"primary\""));
        assert!(html.contains("/events"));

        let (status, json) = call_json(app, "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn events_stream_starts_with_current_view() {
        use futures::StreamExt;

        let app = create_router(AppState::mount());
        let response = app
            .oneshot(Request::builder().uri("/events").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let mut frames = response.into_body().into_data_stream();
        let frame = frames.next().await.unwrap().unwrap();
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(text.contains("event: timer"));

        let data = text.lines().find_map(|line| line.strip_prefix("data: ")).unwrap();
        let view: Value = serde_json::from_str(data).unwrap();
        assert_eq!(view["display"], "25:00");
        assert_eq!(view["primary_label"], "Start");
    }

    #[tokio::test]
    async fn actions_require_post() {
        let app = create_router(AppState::mount());
        let (status, _) = call(app, "GET", "/start").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
