//! Test helpers: multipart request construction, WAV fixture generation
//! and a mock chat-completions provider.

use std::io::Cursor;
use std::path::PathBuf;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::json;

use speechscore::config::ScoringConfig;
use speechscore::AppState;

pub const BOUNDARY: &str = "speechscore-test-boundary";

/// Build a multipart/form-data body with optional transcript and audio parts
pub fn multipart_body(transcript: Option<&str>, audio: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(text) = transcript {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"transcript\"\r\n\r\n{text}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some(bytes) = audio {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; \
                 filename=\"clip.wav\"\r\nContent-Type: audio/wav\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Build a POST /score request from a multipart body
pub fn score_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/score")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Generate an in-memory mono 16-bit WAV with a 440 Hz tone
pub fn sine_wav_bytes(duration_secs: f32, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let total_samples = (duration_secs * sample_rate as f32) as usize;
        for i in 0..total_samples {
            let t = i as f32 / sample_rate as f32;
            let sample = (0.3 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
                * i16::MAX as f32) as i16;
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Build application state pointed at the given provider base URL, staging
/// temp files in `temp_dir` so tests can verify cleanup
pub fn test_state(base_url: &str, temp_dir: PathBuf) -> AppState {
    let config = ScoringConfig {
        api_key: "test-key".to_string(),
        model: "test-model".to_string(),
        api_base_url: base_url.trim_end_matches('/').to_string(),
        port: 0,
        temp_dir,
    };
    AppState::new(&config)
}

/// Spawn a mock provider that wraps `reply_content` in a chat-completions
/// envelope; returns its base URL
pub async fn spawn_mock_provider(reply_content: &str) -> String {
    let content = reply_content.to_string();
    let app = Router::new().route(
        "/chat/completions",
        post(move || async move {
            Json(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": content}}
                ]
            }))
        }),
    );
    serve_on_ephemeral(app).await
}

/// Spawn a mock provider that always returns HTTP 500
pub async fn spawn_failing_provider() -> String {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    serve_on_ephemeral(app).await
}

async fn serve_on_ephemeral(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock provider");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
