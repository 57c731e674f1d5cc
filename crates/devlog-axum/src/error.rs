//! Axum-specific error types and mappings.
//!
//! Every handler failure is a value of [`HttpError`], rendered as a JSON
//! body `{"error": "..."}` with a matching status code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use devlog_core::{InvalidEntry, StoreError};
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Unreadable or unparseable request body.
    #[error("{0}")]
    BadRequest(String),

    /// A candidate in the payload is not a log entry.
    #[error("{0}")]
    InvalidEntry(#[from] InvalidEntry),

    /// The body crossed the configured ceiling.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// The entry store rejected the write.
    #[error("Failed to persist log entries: {0}")]
    Storage(#[from] StoreError),
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidEntry(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
