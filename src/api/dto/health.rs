//! DTOs for health check endpoint.

use serde::Serialize;

/// Health check response with the storage probe result.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
    pub store: CheckStatus,
}

/// Result of probing one component.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
