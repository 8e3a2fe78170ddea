use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};

use crate::api::response;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    ValidationError(String),

    #[error("Inference failed: {0}")]
    InferenceError(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Startup error: {0}")]
    StartupError(String),
}

/// Message returned to clients when inference fails. The underlying cause
/// is logged, never sent back.
pub const INFERENCE_FAILED_MESSAGE: &str = "Summary failed";

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InferenceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::StartupError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::ValidationError(msg) => response::failure(status, msg).into_response(),
            AppError::InferenceError(_) => {
                response::inference_failure(INFERENCE_FAILED_MESSAGE.to_string()).into_response()
            }
            AppError::Forbidden => response::forbidden().into_response(),
            AppError::StartupError(_) => {
                response::failure(status, "Service unavailable".to_string()).into_response()
            }
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::InferenceError(format!("completion request timed out: {}", err))
        } else {
            AppError::InferenceError(err.to_string())
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StartupError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
