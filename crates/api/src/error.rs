//! API error responses

use alerting::SinkError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use storage::StorageError;
use thiserror::Error;
use tracing::error;

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Alert not found: {0}")]
    NotFound(String),

    #[error("Ingest queue is full")]
    QueueFull,

    #[error("Ingest queue is closed")]
    QueueClosed,

    #[error(transparent)]
    Sink(SinkError),

    #[error(transparent)]
    Storage(StorageError),
}

impl From<SinkError> for ApiError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::NotFound(id) => ApiError::NotFound(id),
            other => ApiError::Sink(other),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => ApiError::NotFound(id),
            other => ApiError::Storage(other),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::QueueFull | ApiError::QueueClosed => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Sink(SinkError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Sink(_) | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
