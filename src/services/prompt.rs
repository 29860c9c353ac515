//! Evaluation prompt construction
//!
//! Deterministic template embedding the transcript verbatim and the four
//! acoustic metrics at fixed precision.

use crate::models::AcousticMetrics;

/// Build the evaluation prompt sent to the language model
///
/// The model is instructed to reply with strictly a JSON object carrying
/// exactly `score` (integer 0-100) and `feedback` (string).
pub fn build_prompt(transcript: &str, metrics: &AcousticMetrics) -> String {
    format!(
        "You are evaluating a spoken-language submission.\n\
         \n\
         Recognized transcript:\n\
         {transcript}\n\
         \n\
         Acoustic analysis of the recording:\n\
         - average loudness (RMS): {loudness:.2}\n\
         - zero-crossing rate: {zcr:.4}\n\
         - silence ratio: {silence:.2}%\n\
         - average pitch: {pitch:.2} Hz\n\
         \n\
         Score the submission out of 100, considering:\n\
         - pronunciation accuracy\n\
         - naturalness of delivery\n\
         - pauses, dropouts, or background noise\n\
         - clarity and expressiveness\n\
         \n\
         Speakers differ in intonation and tone, so give specific feedback \
         about this recording rather than generic advice.\n\
         \n\
         Respond with strictly a JSON object with exactly two keys: \
         \"score\" (an integer from 0 to 100) and \"feedback\" (a string). \
         Example:\n\
         {{\"score\": 85, \"feedback\": \"Clear overall, but the pacing is slightly fast.\"}}\n",
        transcript = transcript,
        loudness = metrics.average_loudness,
        zcr = metrics.average_zero_crossing_rate,
        silence = metrics.silence_ratio * 100.0,
        pitch = metrics.average_pitch_hz,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics() -> AcousticMetrics {
        AcousticMetrics {
            average_loudness: 0.3456,
            average_zero_crossing_rate: 0.04219,
            silence_ratio: 0.125,
            average_pitch_hz: 212.3456,
        }
    }

    #[test]
    fn prompt_embeds_transcript_verbatim() {
        let prompt = build_prompt("The quick brown fox.", &sample_metrics());
        assert!(prompt.contains("The quick brown fox."));
    }

    #[test]
    fn prompt_formats_metrics_at_fixed_precision() {
        let prompt = build_prompt("hello", &sample_metrics());
        assert!(prompt.contains("average loudness (RMS): 0.35"));
        assert!(prompt.contains("zero-crossing rate: 0.0422"));
        assert!(prompt.contains("silence ratio: 12.50%"));
        assert!(prompt.contains("average pitch: 212.35 Hz"));
    }

    #[test]
    fn prompt_shows_expected_reply_shape() {
        let prompt = build_prompt("hello", &sample_metrics());
        assert!(prompt.contains("\"score\""));
        assert!(prompt.contains("\"feedback\""));
        assert!(prompt.contains("{\"score\": 85"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let metrics = sample_metrics();
        assert_eq!(build_prompt("same", &metrics), build_prompt("same", &metrics));
    }
}
