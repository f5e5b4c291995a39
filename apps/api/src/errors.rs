use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::pipeline::PipelineError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Responses separate caller mistakes (400) from upstream model trouble (500);
/// raw internal error text is logged, never returned.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Pipeline timed out after {0}s")]
    Timeout(u64),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Pipeline(PipelineError::Stage(e)) => {
                tracing::error!("Stage failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    format!(
                        "Interview generation failed at the '{}' stage. This is likely a \
                        language model service issue (availability, rate limit, or API quota). \
                        Please try again in a few minutes.",
                        e.stage
                    ),
                )
            }
            AppError::Pipeline(PipelineError::Graph(e)) => {
                tracing::error!("Stage table error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::Timeout(secs) => {
                tracing::error!("Pipeline timed out after {secs}s");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TIMEOUT",
                    format!(
                        "Interview generation did not finish within {secs} seconds. \
                        The language model service may be slow or unavailable."
                    ),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "success": false,
            "error": message,
            "code": code,
            "timestamp": chrono::Local::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}
