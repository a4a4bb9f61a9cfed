use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::models::scraped::ScrapeFailure;
use crate::reference::ReferenceError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// No limit or asset-spec entry for the requested channel/subtype.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Scrape failed: {0}")]
    Scrape(String),

    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Reference data error: {0}")]
    ReferenceData(#[from] ReferenceError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Maps a terminal scrape outcome, keeping timeouts distinguishable.
    pub fn from_scrape(failure: &ScrapeFailure) -> Self {
        match failure {
            ScrapeFailure::Timeout => AppError::UpstreamTimeout(failure.to_string()),
            other => AppError::Scrape(other.to_string()),
        }
    }

    /// Maps a model failure that survived the retry budget.
    pub fn from_llm(context: &str, error: LlmError) -> Self {
        let message = format!("{context}: {error}");
        match error {
            LlmError::Timeout => AppError::UpstreamTimeout(message),
            _ => AppError::Llm(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Scrape(msg) => {
                tracing::warn!("Scrape error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SCRAPE_FAILED",
                    format!("Failed to scrape landing page: {msg}"),
                )
            }
            AppError::UpstreamTimeout(msg) => {
                tracing::warn!("Upstream timeout: {msg}");
                (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT", msg.clone())
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::ReferenceData(e) => {
                tracing::error!("Reference data error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REFERENCE_DATA_ERROR",
                    "Reference configuration could not be loaded".to_string(),
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
