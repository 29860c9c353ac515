//! speechscore library interface
//!
//! Exposes the router and application state for integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};

use crate::config::ScoringConfig;
use crate::services::ScoringService;

/// Upper bound for an uploaded audio payload
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Application state shared across handlers
///
/// Holds only immutable configuration; no state is carried between
/// requests.
#[derive(Clone)]
pub struct AppState {
    /// Scoring pipeline (analysis, prompt, model call, parse)
    pub scorer: Arc<ScoringService>,
    /// Directory for transient per-request audio files
    pub temp_dir: PathBuf,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            scorer: Arc::new(ScoringService::new(config)),
            temp_dir: config.temp_dir.clone(),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::score_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
