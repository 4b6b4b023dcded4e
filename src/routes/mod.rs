//! Router assembly: HTTP endpoints, WebSocket upgrade, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - game API under `/api/v1/...`
/// - CORS (allow any origin/method/headers); adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/generateSituation", post(http::http_generate_situation))
        .route("/api/v1/getHint", post(http::http_get_hint))
        .route("/api/v1/acknowledgeDayFinish", post(http::http_acknowledge_day_finish))
        .route("/api/v1/catalog/reload", post(http::http_reload_catalog))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::generation::tests::fixture_config;
    use crate::store::MemoryGenerationStore;

    fn app() -> Router {
        let state = AppState::with_parts(fixture_config(), Arc::new(MemoryGenerationStore::new()));
        build_router(Arc::new(state))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn generate_situation_returns_four_answers() {
        let res = app()
            .oneshot(post_json("/api/v1/generateSituation", r#"{"seed":"demo","iteration":1}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["answers"].as_array().unwrap().len(), 4);
        assert_eq!(body["generationParams"]["seed"], "demo");
        assert!(body["client"]["message"].as_str().unwrap().contains("wants to save"));
    }

    #[tokio::test]
    async fn zero_iteration_is_a_bad_request() {
        let res = app()
            .oneshot(post_json("/api/v1/getHint", r#"{"seed":"demo","iteration":0}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = json_body(res).await;
        assert!(body["error"].as_str().unwrap().contains("iteration"));
    }

    #[tokio::test]
    async fn health_is_ok() {
        let res = app()
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
