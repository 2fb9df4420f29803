use axum::response::Json;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "diet-coach",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
