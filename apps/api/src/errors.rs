use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ollama::OllamaError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Parse failures inside a pipeline stage are NOT errors — they degrade to
/// defaults and the request still answers 200. These variants cover only the
/// aborting cases: bad input, a missing resume, or a dead backend.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Backend timeout")]
    Timeout,

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<OllamaError> for AppError {
    fn from(err: OllamaError) -> Self {
        match err {
            OllamaError::Timeout => AppError::Timeout,
            OllamaError::Unreachable(message) => AppError::Unavailable(message),
            OllamaError::Api { status, message } => {
                AppError::Backend(format!("Ollama service error (status {status}): {message}"))
            }
            OllamaError::Decode(message) => {
                AppError::Backend(format!("Unreadable Ollama response: {message}"))
            }
            OllamaError::Transport(err) => {
                AppError::Unavailable(format!("Ollama connection error: {err}"))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Backend(msg) => {
                tracing::error!("Ollama backend error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "BACKEND_ERROR", msg.clone())
            }
            AppError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "GATEWAY_TIMEOUT",
                "Request timeout. Ollama may be slow or unresponsive.".to_string(),
            ),
            AppError::Unavailable(msg) => {
                tracing::error!("Ollama unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    format!("Cannot connect to Ollama service: {msg}"),
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
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err: AppError = OllamaError::Timeout.into();
        assert!(matches!(err, AppError::Timeout));
    }

    #[test]
    fn test_unreachable_maps_to_unavailable_with_detail() {
        let err: AppError =
            OllamaError::Unreachable("is Ollama running at http://localhost:11434?".to_string())
                .into();
        match err {
            AppError::Unavailable(msg) => assert!(msg.contains("localhost:11434")),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_surfaces_backend_diagnostic() {
        let err: AppError = OllamaError::Api {
            status: 500,
            message: "model not loaded".to_string(),
        }
        .into();
        match err {
            AppError::Backend(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("model not loaded"));
            }
            other => panic!("expected Backend, got {other:?}"),
        }
    }
}
