//! Language-model provider client
//!
//! One synchronous chat-completions request per scoring call. No retry,
//! no streaming; the provider is treated as a plain request/response
//! collaborator.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScoringConfig;
use crate::error::ScoringError;

/// Chat-completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat-completions response envelope (only the fields we read)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions API
pub struct ModelClient {
    /// HTTP client with configured timeouts
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ModelClient {
    /// Create a client from service configuration
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be built (should not happen with
    /// valid config)
    pub fn new(config: &ScoringConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.api_base_url.clone(),
        }
    }

    /// Submit a prompt as a single user-role message and return the raw
    /// reply text
    ///
    /// # Errors
    /// Returns `ScoringError::ModelCall` if:
    /// - the request fails (network, timeout)
    /// - the provider returns a non-success status
    /// - the response envelope cannot be parsed or carries no content
    pub async fn complete(&self, prompt: &str) -> Result<String, ScoringError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Submitting completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ScoringError::ModelCall(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ScoringError::ModelCall(format!(
                "provider returned error status: {}",
                response.status()
            )));
        }

        let envelope: ChatResponse = response
            .json()
            .await
            .map_err(|e| ScoringError::ModelCall(format!("failed to parse response: {}", e)))?;

        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ScoringError::ModelCall("reply contained no content".to_string()))?;

        debug!(reply_len = content.len(), "Completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config() -> ScoringConfig {
        ScoringConfig {
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            api_base_url: "http://localhost:9".to_string(),
            port: 0,
            temp_dir: PathBuf::from("/tmp"),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = ModelClient::new(&test_config());
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.model, "test-model");
        assert_eq!(client.base_url, "http://localhost:9");
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_model_call_error() {
        // Port 9 (discard) is not listening; the request must fail fast
        // and surface as a ModelCall error.
        let client = ModelClient::new(&test_config());
        let result = client.complete("hello").await;
        assert!(matches!(result, Err(ScoringError::ModelCall(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "test-model",
            messages: vec![ChatMessage {
                role: "user",
                content: "prompt text",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "prompt text");
    }
}
