use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Stateless liveness probe.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Local::now().to_rfc3339(),
        "service": "interview-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
