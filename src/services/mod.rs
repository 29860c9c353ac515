//! Scoring services

pub mod audio_analyzer;
pub mod model_client;
pub mod prompt;
pub mod scoring;

pub use audio_analyzer::AudioAnalyzer;
pub use model_client::ModelClient;
pub use prompt::build_prompt;
pub use scoring::{parse_reply, ScoringService};
