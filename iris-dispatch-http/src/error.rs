//! Error handling for the webhook receiver.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use iris_dispatch::config::ConfigError;
use serde_json::json;
use thiserror::Error;

/// Request-level failures, rendered as `{"error": ...}` bodies.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid event batch: {0}")]
    InvalidPayload(String),

    #[error("forbidden")]
    Forbidden,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_) | Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl PartialEq<StatusCode> for AppError {
    fn eq(&self, status_code: &StatusCode) -> bool {
        &self.status() == status_code
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

/// Failures that stop the server itself.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid listen address {address}: {source}")]
    Address {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Logging setup failed: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dispatch(#[from] iris_dispatch::Error),
}
