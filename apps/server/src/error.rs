//! Error types for the HTTP service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use execid_context::ContextError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Execution ID not found in context")]
    ContextNotFound,

    #[error("Process metrics unavailable: {0}")]
    MetricsUnavailable(String),

    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Message safe to hand to the client.
    fn public_message(&self) -> String {
        match self {
            AppError::ContextNotFound => self.to_string(),
            AppError::MetricsUnavailable(_) => "Health check failed".to_string(),
            AppError::Context(_) | AppError::Internal(_) | AppError::Other(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();

        if message != self.to_string() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "statusCode": status.as_u16(),
            "message": message,
        }));

        (status, body).into_response()
    }
}
