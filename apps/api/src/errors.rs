use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("API key not set")]
    CredentialNotSet,

    #[error("Model returned non-JSON output: {0}")]
    ModelOutputNotJson(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("PDF compilation failed: {0}")]
    CompilationFailed(String),

    #[error("Invalid format '{0}'. Use: txt, docx, or pdf")]
    InvalidFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::UnsupportedFormat(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT"),
            AppError::CredentialNotSet => (StatusCode::BAD_REQUEST, "CREDENTIAL_NOT_SET"),
            AppError::ModelOutputNotJson(msg) => {
                tracing::warn!("Model output was not JSON: {msg}");
                (StatusCode::BAD_GATEWAY, "MODEL_OUTPUT_NOT_JSON")
            }
            AppError::TemplateNotFound(path) => {
                tracing::error!("Template missing: {path}");
                (StatusCode::INTERNAL_SERVER_ERROR, "TEMPLATE_NOT_FOUND")
            }
            AppError::CompilationFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "COMPILATION_FAILED")
            }
            AppError::InvalidFormat(_) => (StatusCode::BAD_REQUEST, "INVALID_FORMAT"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Extraction(_) => (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED"),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = match &self {
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
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
