//! Error types for the Provenance server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::pdf::IndexError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Indexing error: {0}")]
    Index(#[from] IndexError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Index(e) => {
                tracing::warn!("Indexing failed: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    "index_error",
                    format!("Failed to index PDF: {}", e),
                )
            }
            AppError::Extraction(e) => {
                // Upstream outcomes are surfaced, not swallowed: the caller
                // must be able to distinguish a bad key from a dead endpoint.
                match e {
                    ExtractionError::MissingApiKey => {
                        (StatusCode::BAD_REQUEST, "missing_api_key", e.to_string())
                    }
                    ExtractionError::Auth(_) => {
                        tracing::error!("Upstream auth failure: {}", e);
                        (StatusCode::BAD_GATEWAY, "upstream_auth", e.to_string())
                    }
                    ExtractionError::Upstream(_) | ExtractionError::MalformedResponse(_) => {
                        tracing::error!("Upstream extraction failure: {}", e);
                        (StatusCode::BAD_GATEWAY, "upstream_error", e.to_string())
                    }
                    ExtractionError::ClientInit(_) => {
                        tracing::error!("Extraction client misconfigured: {}", e);
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "extraction_config",
                            e.to_string(),
                        )
                    }
                }
            }
            AppError::Multipart(e) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                format!("Invalid multipart upload: {}", e),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
