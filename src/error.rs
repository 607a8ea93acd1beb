use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::cin7::UpstreamError;
use crate::orders::models::{FailedUpdate, RemoteOrderId};

/// Top-level error type for the entire application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to fetch orders from fulfillment platform: {0}")]
    UpstreamFetchFailure(#[source] UpstreamError),

    #[error("Failed to update {} of {} orders on fulfillment platform", .failed.len(), .failed.len() + .updated.len())]
    UpstreamUpdateFailure {
        updated: Vec<RemoteOrderId>,
        failed: Vec<FailedUpdate>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// API error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InvalidPayload(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamFetchFailure(_) | AppError::UpstreamUpdateFailure { .. } => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_code, message, details) = match &self {
            AppError::Unauthorized => ("UNAUTHORIZED", "Unauthorized".to_string(), None),
            AppError::InvalidPayload(msg) => ("INVALID_PAYLOAD", msg.clone(), None),
            AppError::InvalidInput(msg) => ("INVALID_INPUT", msg.clone(), None),
            AppError::UpstreamFetchFailure(source) => (
                "UPSTREAM_FETCH_FAILURE",
                "Could not fetch orders from fulfillment platform".to_string(),
                Some(serde_json::json!({
                    "endpoint": source.endpoint(),
                    "status": source.status(),
                })),
            ),
            AppError::UpstreamUpdateFailure { updated, failed } => (
                "UPSTREAM_UPDATE_FAILURE",
                self.to_string(),
                Some(serde_json::json!({
                    "updated": updated,
                    "failed": failed,
                })),
            ),
            AppError::Internal(_) => (
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: message,
            error_code: error_code.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        AppError::Internal(format!("HTTP client error: {:?}", error))
    }
}

/// Result type alias for the application
pub type AppResult<T> = Result<T, AppError>;
