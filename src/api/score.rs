//! Scoring endpoint
//!
//! POST /score accepts a multipart form with `transcript` and `audio`,
//! stages the audio to a transient file, runs the scoring pipeline and
//! maps pipeline failures to degraded 200 responses. The transient file
//! is removed on every exit path.

use std::io::Write;

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult, ScoringError},
    models::ScoringResult,
    AppState,
};

/// Fixed 422 body for missing fields
const VALIDATION_MESSAGE: &str = "transcript and audio are required";

/// Feedback returned when analysis or staging fails internally
const INTERNAL_FAILURE_FEEDBACK: &str = "internal error, scoring failed";

/// Feedback returned when the model call or its reply fails
const MODEL_FAILURE_FEEDBACK: &str = "language model response could not be processed";

/// POST /score
///
/// Returns 422 with a fixed error body when `transcript` or `audio` is
/// missing; otherwise always 200, degrading to a zero score with an
/// explanatory feedback message when scoring fails.
pub async fn submit_scoring(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ScoringResult>> {
    let mut transcript: Option<String> = None;
    let mut audio: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(validation_error)? {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("transcript") => {
                transcript = Some(field.text().await.map_err(validation_error)?);
            }
            Some("audio") => {
                audio = Some(field.bytes().await.map_err(validation_error)?.to_vec());
            }
            _ => {}
        }
    }

    let transcript = match transcript {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(ApiError::Validation(VALIDATION_MESSAGE.to_string())),
    };
    let audio = match audio {
        Some(bytes) => bytes,
        None => return Err(ApiError::Validation(VALIDATION_MESSAGE.to_string())),
    };

    info!(
        transcript_len = transcript.len(),
        audio_bytes = audio.len(),
        "Received scoring request"
    );

    // Stage the audio to a uniquely named transient file. The NamedTempFile
    // guard removes it on every exit path, including early returns.
    let mut tmp = match tempfile::Builder::new()
        .prefix("speechscore-")
        .suffix(".wav")
        .tempfile_in(&state.temp_dir)
    {
        Ok(tmp) => tmp,
        Err(e) => {
            error!(error = %e, "Failed to create transient audio file");
            return Ok(Json(degraded(INTERNAL_FAILURE_FEEDBACK)));
        }
    };
    if let Err(e) = tmp.write_all(&audio).and_then(|_| tmp.flush()) {
        error!(error = %e, "Failed to stage audio payload");
        return Ok(Json(degraded(INTERNAL_FAILURE_FEEDBACK)));
    }

    let result = state.scorer.evaluate(&transcript, tmp.path()).await;

    // Explicit close so a deletion failure is visible to operators. It is
    // never surfaced to the caller.
    if let Err(e) = tmp.close() {
        warn!(error = %e, "Failed to remove transient audio file");
    }

    match result {
        Ok(result) => {
            info!(score = result.score, "Scoring request completed");
            Ok(Json(result))
        }
        Err(err) => {
            error!(error = %err, "Scoring request failed");
            let feedback = match err {
                ScoringError::AudioAnalysis(_) => INTERNAL_FAILURE_FEEDBACK,
                ScoringError::ModelCall(_) | ScoringError::MalformedReply(_) => {
                    MODEL_FAILURE_FEEDBACK
                }
            };
            Ok(Json(degraded(feedback)))
        }
    }
}

fn validation_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    warn!(error = %err, "Failed to read multipart form");
    ApiError::Validation(VALIDATION_MESSAGE.to_string())
}

fn degraded(feedback: &str) -> ScoringResult {
    ScoringResult {
        score: 0,
        feedback: feedback.to_string(),
    }
}

/// Build scoring routes
pub fn score_routes() -> Router<AppState> {
    Router::new().route("/score", post(submit_scoring))
}
