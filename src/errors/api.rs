use crate::errors::internal::{CredentialError, InternalError};
use crate::types::dto::common::ErrorResponse;
use poem::http::StatusCode;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Error responses shared by every endpoint
#[derive(ApiResponse, Debug)]
#[oai(bad_request_handler = "bad_request_handler")]
pub enum ApiError {
    /// Missing or invalid request fields
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Bad credentials, bad token, or inactive account
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Caller lacks the role or ownership required
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Entity not found
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Natural key already in use
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

fn body(error: &str, message: String, status_code: u16) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code,
    })
}

/// Extractor failures (malformed bodies, missing credentials) get the same JSON error shape
fn bad_request_handler(err: poem::Error) -> ApiError {
    if err.status() == StatusCode::UNAUTHORIZED {
        return ApiError::unauthorized(err.to_string());
    }
    ApiError::bad_request(err.to_string())
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(body("bad_request", message.into(), 400))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(body("unauthorized", message.into(), 401))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(body("forbidden", message.into(), 403))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(body("not_found", message.into(), 404))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(body("conflict", message.into(), 409))
    }

    /// Always a generic message; details stay in the server log
    pub fn internal_server_error() -> Self {
        ApiError::InternalError(body(
            "internal_error",
            "An internal error occurred".to_string(),
            500,
        ))
    }

    /// Convert InternalError to ApiError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Infrastructure details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match err {
            InternalError::Validation(message) => {
                tracing::debug!("Validation failed: {}", message);
                Self::bad_request(message)
            }
            InternalError::NotFound { entity, id } => {
                tracing::debug!("{} not found: {}", entity, id);
                Self::not_found(format!("{} not found: {}", entity, id))
            }
            InternalError::Forbidden(message) => {
                tracing::warn!("Forbidden: {}", message);
                Self::forbidden(message)
            }
            InternalError::Conflict(message) => {
                tracing::debug!("Conflict: {}", message);
                Self::conflict(message)
            }
            InternalError::Credential(credential) => {
                tracing::debug!("Credential error: {}", credential);
                let message = match credential {
                    CredentialError::InvalidCredentials => "Invalid username or password",
                    CredentialError::AccountInactive(_) => "Account is inactive",
                    CredentialError::InvalidToken(_) => "Invalid or malformed token",
                    CredentialError::ExpiredToken => "Token has expired",
                    CredentialError::UnknownCaller(_) => "Unknown or inactive user",
                    CredentialError::InvalidAdminToken => "Invalid admin token",
                };
                Self::unauthorized(message)
            }
            err @ (InternalError::Database(_) | InternalError::Crypto { .. }) => {
                tracing::error!("Internal error: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }

    fn body(&self) -> &ErrorResponse {
        match self {
            ApiError::BadRequest(json)
            | ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::Conflict(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
