//! HTTP API handlers for speechscore

pub mod health;
pub mod score;

pub use health::health_routes;
pub use score::score_routes;
