use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::launcher::LaunchStep;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Device command failed at step {step}: {reason}")]
    DeviceCommand { step: LaunchStep, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wraps a hub failure with the choreography step that issued it
    pub fn device(step: LaunchStep, source: AppError) -> Self {
        AppError::DeviceCommand {
            step,
            reason: source.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Store(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UnknownService(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) | AppError::DeviceCommand { .. } => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::Store(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
