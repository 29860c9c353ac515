//! Acoustic feature extraction
//!
//! Decodes a recording at its native sample rate, downmixes to mono and
//! computes framewise RMS energy, zero-crossing rate, silence ratio and an
//! autocorrelation pitch estimate bounded to the vocal range.

use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::error::ScoringError;
use crate::models::AcousticMetrics;

/// Analysis frame length in samples
pub const FRAME_SIZE: usize = 2048;

/// Hop between consecutive frames in samples
pub const HOP_SIZE: usize = 512;

/// A frame counts as silent when its RMS is below this fraction of the
/// mean RMS across all frames. Relative, not absolute: quiet-but-consistent
/// recordings yield a near-zero silence ratio.
pub const SILENCE_RMS_FACTOR: f64 = 0.1;

/// Pitch search floor, musical C2
pub const PITCH_FMIN_HZ: f64 = 65.41;

/// Pitch search ceiling, musical C7
pub const PITCH_FMAX_HZ: f64 = 2093.0;

/// Minimum normalized autocorrelation for a frame to count as voiced
const VOICED_MIN_CORRELATION: f64 = 0.5;

/// Acoustic analyzer over decoded mono PCM
pub struct AudioAnalyzer;

impl AudioAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Decode an audio file and compute its acoustic metrics
    ///
    /// # Arguments
    /// * `path` - Audio file path (WAV expected, any symphonia-supported
    ///   format works)
    ///
    /// # Errors
    /// Returns `ScoringError::AudioAnalysis` on decode failure or when the
    /// file contains no samples. Pitch estimation never fails by itself;
    /// it defaults to 0.0 when no voiced frames are found.
    pub fn analyze(&self, path: &Path) -> Result<AcousticMetrics, ScoringError> {
        let (samples, sample_rate) = decode_mono(path)?;
        if samples.is_empty() {
            return Err(ScoringError::AudioAnalysis(
                "no audio samples decoded".to_string(),
            ));
        }

        let metrics = analyze_samples(&samples, sample_rate);
        debug!(
            sample_count = samples.len(),
            sample_rate,
            loudness = metrics.average_loudness,
            zcr = metrics.average_zero_crossing_rate,
            silence_ratio = metrics.silence_ratio,
            pitch_hz = metrics.average_pitch_hz,
            "Acoustic analysis complete"
        );
        Ok(metrics)
    }
}

impl Default for AudioAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute all framewise metrics over a mono signal
fn analyze_samples(samples: &[f32], sample_rate: u32) -> AcousticMetrics {
    let frame_count = frame_starts(samples.len()).count();

    let mut rms_values = Vec::with_capacity(frame_count);
    let mut zcr_sum = 0.0f64;
    let mut pitch_sum = 0.0f64;
    let mut voiced_frames = 0usize;

    for start in frame_starts(samples.len()) {
        let end = (start + FRAME_SIZE).min(samples.len());
        let frame = &samples[start..end];

        rms_values.push(frame_rms(frame));
        zcr_sum += frame_zero_crossing_rate(frame);
        if let Some(pitch) = frame_pitch(frame, sample_rate) {
            pitch_sum += pitch;
            voiced_frames += 1;
        }
    }

    let mean_rms = rms_values.iter().sum::<f64>() / rms_values.len() as f64;

    // All-zero input gives mean_rms == 0.0, so no frame falls below the
    // relative threshold and the ratio is a defined 0.0.
    let silence_threshold = SILENCE_RMS_FACTOR * mean_rms;
    let silent_frames = rms_values
        .iter()
        .filter(|&&rms| rms < silence_threshold)
        .count();

    let average_pitch_hz = if voiced_frames > 0 {
        pitch_sum / voiced_frames as f64
    } else {
        0.0
    };

    AcousticMetrics {
        average_loudness: mean_rms,
        average_zero_crossing_rate: zcr_sum / rms_values.len() as f64,
        silence_ratio: silent_frames as f64 / rms_values.len() as f64,
        average_pitch_hz,
    }
}

/// Frame start offsets for a signal of the given length (at least one
/// frame for any non-empty signal)
fn frame_starts(len: usize) -> impl Iterator<Item = usize> {
    (0..len).step_by(HOP_SIZE)
}

/// RMS energy of one frame
fn frame_rms(frame: &[f32]) -> f64 {
    let sum_squares: f64 = frame.iter().map(|&s| (s as f64).powi(2)).sum();
    (sum_squares / frame.len() as f64).sqrt()
}

/// Zero-crossing rate of one frame as a fraction of samples (0.0-1.0)
fn frame_zero_crossing_rate(frame: &[f32]) -> f64 {
    if frame.len() < 2 {
        return 0.0;
    }

    let crossings = frame
        .windows(2)
        .filter(|w| (w[0] >= 0.0 && w[1] < 0.0) || (w[0] < 0.0 && w[1] >= 0.0))
        .count();

    crossings as f64 / frame.len() as f64
}

/// Fundamental frequency of one frame via normalized autocorrelation,
/// bounded to [PITCH_FMIN_HZ, PITCH_FMAX_HZ]
///
/// Returns `None` for silent, unvoiced or partial trailing frames. The
/// frame is mean-centered first so a DC offset cannot masquerade as
/// periodicity. Among near-equal correlation peaks the smallest lag wins,
/// which suppresses octave errors on strongly periodic frames.
fn frame_pitch(frame: &[f32], sample_rate: u32) -> Option<f64> {
    if frame.len() < FRAME_SIZE {
        return None;
    }

    let min_lag = (sample_rate as f64 / PITCH_FMAX_HZ).floor() as usize;
    let mut max_lag = (sample_rate as f64 / PITCH_FMIN_HZ).ceil() as usize;
    if max_lag >= frame.len() {
        max_lag = frame.len() - 1;
    }
    if min_lag < 1 || min_lag >= max_lag {
        return None;
    }

    let mean = frame.iter().map(|&s| s as f64).sum::<f64>() / frame.len() as f64;
    let centered: Vec<f64> = frame.iter().map(|&s| s as f64 - mean).collect();

    let total_energy: f64 = centered.iter().map(|&v| v * v).sum();
    if total_energy < 1e-10 {
        return None;
    }

    // Normalized cross-correlation per candidate lag.
    let mut correlations = vec![0.0f64; max_lag + 1];
    let mut best = 0.0f64;
    for lag in min_lag..=max_lag {
        let n = centered.len() - lag;
        let mut cross = 0.0f64;
        let mut head_energy = 0.0f64;
        let mut tail_energy = 0.0f64;
        for i in 0..n {
            let a = centered[i];
            let b = centered[i + lag];
            cross += a * b;
            head_energy += a * a;
            tail_energy += b * b;
        }
        let norm = (head_energy * tail_energy).sqrt();
        if norm > 1e-10 {
            correlations[lag] = cross / norm;
            if correlations[lag] > best {
                best = correlations[lag];
            }
        }
    }

    if best < VOICED_MIN_CORRELATION {
        return None;
    }

    // Smallest local correlation peak within 3% of the global one; a
    // multiple of the true period scores nearly as high, the smallest
    // peak is the fundamental.
    let chosen = (min_lag..=max_lag).find(|&lag| {
        let c = correlations[lag];
        c >= 0.97 * best
            && c >= correlations[lag - 1]
            && (lag == max_lag || c >= correlations[lag + 1])
    })?;
    Some(sample_rate as f64 / chosen as f64)
}

/// Decode an audio file to mono f32 PCM at its native sample rate
fn decode_mono(path: &Path) -> Result<(Vec<f32>, u32), ScoringError> {
    let file = std::fs::File::open(path).map_err(|e| {
        ScoringError::AudioAnalysis(format!("failed to open {}: {}", path.display(), e))
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| ScoringError::AudioAnalysis(format!("unrecognized audio format: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| ScoringError::AudioAnalysis("no audio tracks found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| ScoringError::AudioAnalysis("sample rate not specified".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| ScoringError::AudioAnalysis(format!("failed to create decoder: {}", e)))?;

    let mut mono = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(ScoringError::AudioAnalysis(format!(
                    "failed to read packet: {}",
                    e
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(|e| {
            ScoringError::AudioAnalysis(format!("failed to decode packet: {}", e))
        })?;

        let spec = *decoded.spec();
        let channels = spec.channels.count();

        if sample_buf.is_none() {
            sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }
        let buf = sample_buf.as_mut().unwrap();
        buf.copy_interleaved_ref(decoded);

        // Downmix interleaved channels by averaging.
        for chunk in buf.samples().chunks(channels) {
            let sum: f32 = chunk.iter().sum();
            mono.push(sum / channels as f32);
        }
    }

    Ok((mono, sample_rate))
}
