//! Response bodies with a stable JSON shape.

use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// ISO-8601 UTC time the response was produced.
    pub timestamp: String,
}

/// Body of a successful ingestion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IngestResponse {
    pub success: bool,
}
