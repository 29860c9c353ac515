//! Error types for speechscore
//!
//! Two layers: `ApiError` is the transport-facing error (the only
//! HTTP-error-class response this service ever produces is the 422
//! validation failure), and `ScoringError` covers failures inside the
//! scoring pipeline, which the handler maps to degraded 200 responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (422) - missing transcript or audio
    #[error("{0}")]
    Validation(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Scoring pipeline errors
///
/// None of these reach the transport boundary directly: the request
/// handler converts them into a degraded `ScoringResult` with score 0.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Audio decode or feature extraction failed
    #[error("Audio analysis failed: {0}")]
    AudioAnalysis(String),

    /// Language model request failed (network, HTTP status, envelope)
    #[error("Model call failed: {0}")]
    ModelCall(String),

    /// Model reply content was not the expected JSON object
    #[error("Malformed model reply: {0}")]
    MalformedReply(String),
}
