use axum::Json;
use serde_json::{json, Value};

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "scopira-api"
    }))
}

/// GET /
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "message": "Scopira career platform API",
        "health": "/health"
    }))
}
