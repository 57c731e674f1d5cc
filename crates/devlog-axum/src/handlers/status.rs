//! Liveness and service description handlers.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use devlog_core::SERVICE_NAME;
use serde_json::{Value, json};

use crate::dto::HealthResponse;

/// Liveness probe. Never touches the store.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Service description served at `GET /`.
pub async fn describe() -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "status": "running",
        "message": "Dev-log server is running. POST logs to / or /logs",
        "endpoints": {
            "POST /": "Submit logs",
            "POST /logs": "Submit logs (alternative)",
            "GET /logs": "Get all logs",
            "GET /health": "Health check",
        },
    }))
}
