//! Scoring pipeline
//!
//! One linear pass per request: analyze audio, build the evaluation
//! prompt, call the model, parse its reply. Every failure surfaces as a
//! typed `ScoringError`; the request handler decides how to degrade.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::models::ScoringResult;
use crate::services::audio_analyzer::AudioAnalyzer;
use crate::services::model_client::ModelClient;
use crate::services::prompt::build_prompt;

/// Scoring service holding only immutable configuration
pub struct ScoringService {
    client: ModelClient,
}

impl ScoringService {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            client: ModelClient::new(config),
        }
    }

    /// Score one submission
    ///
    /// # Arguments
    /// * `transcript` - Recognized text of the submission
    /// * `audio_path` - Path to the staged audio file
    ///
    /// # Errors
    /// * `ScoringError::AudioAnalysis` - decode or feature extraction failed
    /// * `ScoringError::ModelCall` - provider request failed
    /// * `ScoringError::MalformedReply` - reply content was not JSON
    pub async fn evaluate(
        &self,
        transcript: &str,
        audio_path: &Path,
    ) -> Result<ScoringResult, ScoringError> {
        // Decode and DSP are CPU-bound; keep them off the async workers.
        let path = audio_path.to_path_buf();
        let metrics = tokio::task::spawn_blocking(move || AudioAnalyzer::new().analyze(&path))
            .await
            .map_err(|e| ScoringError::AudioAnalysis(format!("analysis task failed: {}", e)))??;

        let prompt = build_prompt(transcript, &metrics);
        let raw_reply = self.client.complete(&prompt).await?;

        let result = parse_reply(&raw_reply)?;
        debug!(score = result.score, "Scoring pipeline complete");
        Ok(result)
    }
}

/// Parse the model's reply content into a `ScoringResult`
///
/// The reply must be a JSON object. A missing `score` coerces to 0 and a
/// missing `feedback` to the empty string; anything that is not JSON at
/// all is a `MalformedReply`.
pub fn parse_reply(raw: &str) -> Result<ScoringResult, ScoringError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| ScoringError::MalformedReply(format!("reply is not JSON: {}", e)))?;

    let score = value.get("score").and_then(coerce_score).unwrap_or(0);
    let feedback = value
        .get("feedback")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Ok(ScoringResult { score, feedback })
}

/// Coerce a JSON number to an integer score
fn coerce_score(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.round() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_reply() {
        let result = parse_reply(r#"{"score": 85, "feedback": "clear pronunciation"}"#).unwrap();
        assert_eq!(result.score, 85);
        assert_eq!(result.feedback, "clear pronunciation");
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let result = parse_reply("\n  {\"score\": 70, \"feedback\": \"ok\"}  \n").unwrap();
        assert_eq!(result.score, 70);
    }

    #[test]
    fn missing_score_defaults_to_zero() {
        let result = parse_reply(r#"{"feedback": "no score given"}"#).unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.feedback, "no score given");
    }

    #[test]
    fn missing_feedback_defaults_to_empty() {
        let result = parse_reply(r#"{"score": 42}"#).unwrap();
        assert_eq!(result.score, 42);
        assert_eq!(result.feedback, "");
    }

    #[test]
    fn fractional_score_rounds() {
        let result = parse_reply(r#"{"score": 87.6, "feedback": "good"}"#).unwrap();
        assert_eq!(result.score, 88);
    }

    #[test]
    fn non_json_reply_is_malformed() {
        let result = parse_reply("I would give this an 85 out of 100.");
        assert!(matches!(result, Err(ScoringError::MalformedReply(_))));
    }

    #[test]
    fn empty_reply_is_malformed() {
        let result = parse_reply("");
        assert!(matches!(result, Err(ScoringError::MalformedReply(_))));
    }
}
