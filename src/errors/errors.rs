use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::controllayer::types::ResponseEnvelope;

/// Main error type for the car models service
#[derive(Debug)]
pub enum ServiceError {
    // Database Errors
    DatabaseError(String),
    DatabaseConnectionError,

    // Invocation Errors
    FunctionNotFound(String),
    InvalidEvent(String),

    // Internal Errors
    InternalServerError(String),
    ConfigurationError(String),
}

/// Error response structure sent to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ServiceError::DatabaseConnectionError => write!(f, "Failed to connect to database"),

            ServiceError::FunctionNotFound(name) => write!(f, "Function not found: {}", name),
            ServiceError::InvalidEvent(msg) => write!(f, "Invalid event: {}", msg),

            ServiceError::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
            ServiceError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            ServiceError::InvalidEvent(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            ServiceError::FunctionNotFound(_) => StatusCode::NOT_FOUND,

            // 503 Service Unavailable
            ServiceError::DatabaseConnectionError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            ServiceError::DatabaseError(_)
            | ServiceError::InternalServerError(_)
            | ServiceError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::DatabaseError(_) => "DATABASE_ERROR",
            ServiceError::DatabaseConnectionError => "DATABASE_CONNECTION_ERROR",

            ServiceError::FunctionNotFound(_) => "FUNCTION_NOT_FOUND",
            ServiceError::InvalidEvent(_) => "INVALID_EVENT",

            ServiceError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ServiceError::ConfigurationError(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Message that is safe to hand back to a caller.
    ///
    /// Server-side failures carry driver or configuration detail that only
    /// belongs in the logs, so they collapse to a fixed sentence.
    pub fn client_message(&self) -> String {
        match self {
            ServiceError::DatabaseError(_) => "Failed to query the car catalogue".to_string(),
            ServiceError::InternalServerError(_) | ServiceError::ConfigurationError(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Build the JSON error body for this error
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.client_message(),
            },
        }
    }

    /// Render the error as a handler response envelope
    pub fn to_envelope(&self) -> ResponseEnvelope {
        ResponseEnvelope::json(self.status_code(), &self.to_error_response())
    }
}

/// Implement IntoResponse for Axum integration
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.to_error_response())).into_response()
    }
}

/// Conversion from sqlx errors
impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::WorkerCrashed => ServiceError::DatabaseConnectionError,
            _ => ServiceError::DatabaseError(err.to_string()),
        }
    }
}

/// Type alias for Results using ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;
