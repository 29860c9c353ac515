//! Data models for speechscore
//!
//! All value types; nothing here outlives a single request.

use serde::{Deserialize, Serialize};

/// Signal-level statistics derived from one audio recording
///
/// Immutable once computed; every field is a mean (or ratio) over
/// fixed-size analysis frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AcousticMetrics {
    /// Mean framewise RMS energy
    pub average_loudness: f64,
    /// Mean framewise zero-crossing rate (fraction of samples, 0.0-1.0)
    pub average_zero_crossing_rate: f64,
    /// Fraction of frames classified as silent (0.0-1.0)
    pub silence_ratio: f64,
    /// Mean fundamental frequency of voiced frames, 0.0 if none detected
    pub average_pitch_hz: f64,
}

/// Score and feedback returned to the caller
///
/// `score` is intended to be 0-100 but the range is not enforced; the
/// language model is instructed to stay within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub score: i64,
    pub feedback: String,
}
