//! Test backend mirroring the service the load generator targets: a
//! key-gated `/run` endpoint plus delay and status helpers for tests.

use axum::{
    debug_handler,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tower_http::trace::TraceLayer;
use tracing::debug;

#[derive(Clone, Default)]
pub struct MockConfig {
    /// When set, `/run` returns 401 unless `X-API-Key` matches.
    pub api_key: Option<String>,
}

pub fn router(config: MockConfig) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/run", get(run_stub))
        .route("/delay/ms/:delay_ms", get(delay))
        .route("/status/:code", get(status))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(config))
}

pub async fn run(addr: SocketAddr, config: MockConfig) {
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, router(config)).await.unwrap();
}

#[debug_handler]
async fn healthz() -> &'static str {
    "ok"
}

#[debug_handler]
async fn run_stub(State(config): State<Arc<MockConfig>>, headers: HeaderMap) -> Response {
    if let Some(expected) = &config.api_key {
        let provided = headers.get("x-api-key").and_then(|value| value.to_str().ok());
        if provided != Some(expected.as_str()) {
            debug!("Rejecting /run: missing or wrong api key");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "unauthorized" })),
            )
                .into_response();
        }
    }

    let timestamp = humantime::format_rfc3339(SystemTime::now()).to_string();
    Json(json!({ "timestamp": timestamp, "result": "stub" })).into_response()
}

#[debug_handler]
async fn delay(Path(delay_ms): Path<u64>) {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}

#[debug_handler]
async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
