//! Server-specific error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::response::ErrorResponse;
use crate::extract::ExtractError;
use hdp_common::HdpError;

/// Result type alias for server operations
pub type ServerResult<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("HDP error: {0}")]
    Hdp(#[from] HdpError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Extract(ref e) => {
                tracing::error!("Extraction error: {:?}", e);
                (StatusCode::BAD_GATEWAY, "extraction_failed", e.to_string())
            },
            AppError::Hdp(ref e) => {
                tracing::error!("Pipeline error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "pipeline_error", e.to_string())
            },
            AppError::Config(ref message) => {
                tracing::error!("Configuration error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "config_error",
                    "Server configuration error".to_string(),
                )
            },
            AppError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message.clone())
            },
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
