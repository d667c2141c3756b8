// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("Photo not found with name: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Could not decode image: {0}")]
    DecodeError(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid review option: {0}")]
    InvalidReviewOption(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Convert PhotoError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for PhotoError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = match self {
            PhotoError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            PhotoError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            PhotoError::DecodeError(_) => (StatusCode::UNPROCESSABLE_ENTITY, "DECODE_ERROR"),
            PhotoError::UnsupportedFormat(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
            }
            PhotoError::InvalidReviewOption(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_REVIEW_OPTION")
            }
            PhotoError::StorageError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            PhotoError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PhotoError::NotFound(_) => StatusCode::NOT_FOUND,
            PhotoError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PhotoError::DecodeError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PhotoError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            PhotoError::InvalidReviewOption(_) => StatusCode::BAD_REQUEST,
            PhotoError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PhotoError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
