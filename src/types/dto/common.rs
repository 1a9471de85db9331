use poem_openapi::{ApiResponse, Object};
use serde::Serialize;

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,

    /// Whether the database answered a ping
    pub database: String,
}

/// Standardized error response model
#[derive(Object, Debug, Clone, Serialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Error type or category
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Response for deletes and other updates with nothing to return
#[derive(ApiResponse, Debug)]
pub enum NoContentApiResponse {
    /// Done
    #[oai(status = 204)]
    NoContent,
}
