//! HTTP error handling and response types.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::CoverageError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Missing or unreadable form part
    BadRequest(String),
    /// Upload exceeds the configured body limit
    PayloadTooLarge(String),
    /// Blocking task failure
    Internal(String),
    /// Rejected by the coverage pipeline
    Coverage(CoverageError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiError::new("PAYLOAD_TOO_LARGE", msg),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Coverage(e) => {
                let error = match &e {
                    CoverageError::MalformedInput {
                        source_name,
                        format,
                        ..
                    } => ApiError::new(e.code(), e.to_string())
                        .with_details(format!("{} ({})", source_name, format)),
                    CoverageError::InvalidRange { .. } => ApiError::new(e.code(), e.to_string()),
                };
                (StatusCode::BAD_REQUEST, error)
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<CoverageError> for AppError {
    fn from(err: CoverageError) -> Self {
        AppError::Coverage(err)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        let message = format!("Invalid multipart body: {}", err.body_text());
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(message)
        } else {
            AppError::BadRequest(message)
        }
    }
}
