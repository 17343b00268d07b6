//! Error responses for the HTTP API.

use crate::probe::ProbeError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid PID")]
    InvalidPid,

    #[error("Failed to fetch ports")]
    Scan(#[source] ProbeError),

    #[error("Failed to kill process")]
    Kill(#[source] ProbeError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InvalidPid => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            ApiError::Scan(source) | ApiError::Kill(source) => {
                error!("{}: {}", self, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": self.to_string(),
                        "details": source.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}
