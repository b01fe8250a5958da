// Application state and router assembly

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    app_config::AppConfig,
    handlers::{self, docs},
    middleware::dynamic_cors_middleware,
    storage::Storage,
};

/// Application state shared across handlers. The storage backend is injected
/// here so tests can run against isolated in-memory instances.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, storage: Arc<dyn Storage>) -> Self {
        AppState { config, storage }
    }
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", handlers::auth_routes())
        .nest("/api/ads", handlers::ad_routes());

    if state.config.enable_swagger_ui {
        router = router
            .route("/api/docs", get(docs::serve_swagger_ui))
            .route("/api/docs/openapi.json", get(docs::serve_openapi_spec));
    }

    router
        .layer(axum::middleware::from_fn(dynamic_cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Component health report
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let timestamp = chrono::Utc::now().to_rfc3339();

    let storage_health = match state.storage.health_check().await {
        Ok(()) => serde_json::json!({
            "status": "healthy",
            "backend": state.storage.backend_name(),
            "error": null
        }),
        Err(e) => serde_json::json!({
            "status": "unhealthy",
            "backend": state.storage.backend_name(),
            "error": e.to_string()
        }),
    };

    let overall_healthy = storage_health["status"] == "healthy";

    let response = serde_json::json!({
        "status": if overall_healthy { "healthy" } else { "degraded" },
        "service": "nostr-adboard",
        "timestamp": timestamp,
        "components": {
            "storage": storage_health
        }
    });

    if overall_healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
