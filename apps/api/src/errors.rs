use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::intake::IntakeError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Variants group into three classes: input (bad upload), configuration
/// (credential) and upstream (model API). Every class ends the flow with a
/// user-facing message and no partial result.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    #[error("File too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::UnsupportedFile(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FILE")
            }
            AppError::PayloadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE")
            }
            AppError::UnreadableDocument(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNREADABLE_DOCUMENT")
            }
            AppError::Configuration(_) => (StatusCode::SERVICE_UNAVAILABLE, "CONFIGURATION_ERROR"),
            AppError::QuotaExceeded(_) => (StatusCode::TOO_MANY_REQUESTS, "QUOTA_EXCEEDED"),
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            AppError::MalformedResponse(_) => (StatusCode::BAD_GATEWAY, "MALFORMED_AI_RESPONSE"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::NotPdf => AppError::UnsupportedFile(err.to_string()),
            IntakeError::Corrupt(_) | IntakeError::NoTextLayer => {
                AppError::UnreadableDocument(err.to_string())
            }
            IntakeError::Worker(e) => AppError::Internal(anyhow::anyhow!(e)),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => AppError::Configuration(
                "DEEPSEEK_API_KEY is not set. Add it to the environment or the .env file and restart the server."
                    .to_string(),
            ),
            LlmError::InvalidApiKey(msg) => {
                AppError::Configuration(format!("The AI service rejected the API key: {msg}"))
            }
            LlmError::QuotaExceeded { message, .. } => AppError::QuotaExceeded(format!(
                "The AI service quota is exhausted or rate limited: {message}"
            )),
            LlmError::Http(e) => AppError::Upstream(format!("Could not reach the AI service: {e}")),
            LlmError::Api { status, message } => AppError::Upstream(format!(
                "The AI service returned status {status}: {message}"
            )),
            LlmError::Parse(e) => AppError::MalformedResponse(format!(
                "The AI reply was not the expected JSON: {e}"
            )),
            LlmError::EmptyContent => {
                AppError::MalformedResponse("The AI service returned an empty reply".to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Validation(format!("Invalid form: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Validation(msg)
            | AppError::UnsupportedFile(msg)
            | AppError::UnreadableDocument(msg) => msg.clone(),
            AppError::PayloadTooLarge { limit } => {
                format!("The file is too large. Maximum size is {limit} bytes.")
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                msg.clone()
            }
            AppError::QuotaExceeded(msg) => {
                tracing::warn!("Quota exceeded: {msg}");
                msg.clone()
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                msg.clone()
            }
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed AI response: {msg}");
                msg.clone()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
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
