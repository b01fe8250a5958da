// Shared helpers for integration tests: an app wired to a fresh in-memory
// storage instance, driven through tower's oneshot.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use nostr_adboard::{
    app::{build_router, AppState},
    app_config,
    storage::MemStorage,
};
use tower::ServiceExt;

pub fn test_app() -> Router {
    let config = Arc::new(app_config::config().clone());
    let storage = Arc::new(MemStorage::new());
    build_router(AppState::new(config, storage))
}

/// Send one request, returning the status and the JSON body (Null for an
/// empty body).
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");

    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}
