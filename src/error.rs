//! Error types surfaced to HTTP clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Message carried by the failure the error simulator raises.
pub const SIMULATED_ERROR_MESSAGE: &str = "Simulated error for testing ELK stack";

#[derive(Debug, Error)]
pub enum AppError {
    /// Deliberate failure raised by the error simulator.
    #[error("{0}")]
    Simulated(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn simulated() -> Self {
        Self::Simulated(SIMULATED_ERROR_MESSAGE.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Simulated(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn client_code(&self) -> &'static str {
        match self {
            AppError::Simulated(_) => "SIMULATED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.client_code(),
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
