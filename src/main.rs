//! speechscore - Spoken-language scoring service
//!
//! Scores a transcript plus its audio recording by combining framewise
//! acoustic metrics with a language-model judgment. One inbound route
//! (POST /score) plus a health check.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use speechscore::config::ScoringConfig;
use speechscore::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting speechscore service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Fail fast before binding the listener if the credential is absent.
    let config = ScoringConfig::from_env()?;
    info!(model = %config.model, "Configuration resolved");

    let state = AppState::new(&config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Listening on http://0.0.0.0:{}", config.port);
    info!("Health check: http://0.0.0.0:{}/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
