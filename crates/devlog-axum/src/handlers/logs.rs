//! Log ingestion and retrieval handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use devlog_core::{LogEntry, normalize_payload, validate_batch};
use futures_util::StreamExt;
use serde_json::Value;
use tracing::debug;

use crate::dto::IngestResponse;
use crate::error::HttpError;
use crate::state::AppState;

/// Return every stored entry in arrival order.
pub async fn list(State(state): State<AppState>) -> Json<Vec<LogEntry>> {
    Json(state.store.read_all().await)
}

/// Accept one entry or an array of entries.
///
/// The batch is all-or-nothing: one invalid candidate rejects the request
/// and nothing is stored.
pub async fn ingest(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<IngestResponse>, HttpError> {
    let bytes = read_capped(&headers, body, state.max_body_bytes).await?;

    let payload: Value =
        serde_json::from_slice(&bytes).map_err(|e| HttpError::BadRequest(e.to_string()))?;
    let entries = validate_batch(normalize_payload(payload))?;

    debug!(count = entries.len(), "Accepted log entries");
    state.store.append(entries).await?;

    Ok(Json(IngestResponse { success: true }))
}

/// Collect the request body, failing as soon as it exceeds `limit` bytes.
async fn read_capped(headers: &HeaderMap, body: Body, limit: usize) -> Result<Vec<u8>, HttpError> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if declared.is_some_and(|len| len > limit as u64) {
        return Err(HttpError::PayloadTooLarge);
    }

    let mut buf = Vec::with_capacity(declared.and_then(|len| usize::try_from(len).ok()).unwrap_or(0));
    let mut stream = body.into_data_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| HttpError::BadRequest(e.to_string()))?;
        if buf.len() + chunk.len() > limit {
            return Err(HttpError::PayloadTooLarge);
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}
