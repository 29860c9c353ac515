//! Configuration resolution for speechscore
//!
//! All configuration comes from the process environment, resolved once at
//! startup into an explicit `ScoringConfig`. A missing API key is fatal
//! before the server accepts traffic.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

/// Model identifier used when `SPEECHSCORE_MODEL` is not set
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Chat-completions endpoint base used when `SPEECHSCORE_API_BASE_URL` is not set
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Listen port used when `SPEECHSCORE_PORT` is not set
pub const DEFAULT_PORT: u16 = 8000;

/// Configuration loading or validation error
#[derive(Debug, Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(pub String);

/// Immutable service configuration, fixed at startup
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// API key for the language-model provider
    pub api_key: String,
    /// Model identifier sent with every completion request
    pub model: String,
    /// Base URL of the chat-completions API (no trailing slash)
    pub api_base_url: String,
    /// HTTP listen port
    pub port: u16,
    /// Directory for transient per-request audio files
    pub temp_dir: PathBuf,
}

impl ScoringConfig {
    /// Resolve configuration from the process environment
    ///
    /// # Errors
    /// Returns `ConfigError` if `OPENAI_API_KEY` is absent or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| is_valid_key(key))
            .ok_or_else(|| {
                ConfigError(
                    "OPENAI_API_KEY not configured. Set it in the environment, e.g.\n\
                     OPENAI_API_KEY=sk-... speechscore"
                        .to_string(),
                )
            })?;
        info!("Model API key loaded from environment");

        let model = match std::env::var("SPEECHSCORE_MODEL").ok().filter(|m| is_valid_key(m)) {
            Some(model) => {
                info!(model = %model, "Model identifier overridden from environment");
                model
            }
            None => DEFAULT_MODEL.to_string(),
        };

        let api_base_url = std::env::var("SPEECHSCORE_API_BASE_URL")
            .ok()
            .filter(|url| is_valid_key(url))
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let port = match std::env::var("SPEECHSCORE_PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Unparseable SPEECHSCORE_PORT, using default {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            api_key,
            model,
            api_base_url,
            port,
            temp_dir: std::env::temp_dir(),
        })
    }
}

/// Validate a configuration value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
