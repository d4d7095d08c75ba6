//! Liveness endpoints.

use axum::Json;

/// GET / - Plain-text liveness probe.
pub async fn root() -> &'static str {
    "OK"
}

/// GET /health - Health check with the running version.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
