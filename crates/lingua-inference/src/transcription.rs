//! HTTP speech-to-text backend.
//!
//! Talks to a Whisper-compatible server (faster-whisper-server / Speaches)
//! over the OpenAI audio API shape. VAD filtering and beam search are
//! requested as form fields; the verbose response carries the detected
//! language and its probability alongside the text. Settings are
//! snapshotted from the injected config per call, so a runtime config swap
//! takes effect on the next transcription.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use lingua_core::{defaults, Error, Result, SpeechBackend, SpeechTranscript};

use crate::config::ConfigService;

#[derive(Deserialize)]
struct VerboseTranscription {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    language_probability: Option<f64>,
}

fn transcribe_endpoint(base_url: &str) -> String {
    format!(
        "{}/v1/audio/transcriptions",
        base_url.trim_end_matches('/')
    )
}

pub struct WhisperBackend {
    client: Client,
    config: Arc<ConfigService>,
}

impl WhisperBackend {
    pub fn new(config: Arc<ConfigService>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(defaults::WHISPER_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Probe the speech server for liveness.
    pub async fn health_check(&self) -> bool {
        let settings = self.config.whisper().await;
        let url = format!("{}/health", settings.base_url.trim_end_matches('/'));
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl SpeechBackend for WhisperBackend {
    async fn transcribe(&self, path: &Path, language: Option<&str>) -> Result<SpeechTranscript> {
        let start = Instant::now();
        let settings = self.config.whisper().await;

        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        let file_part = multipart::Part::bytes(bytes).file_name(filename);
        let mut form = multipart::Form::new()
            .part("file", file_part)
            .text("model", settings.model.clone())
            .text("vad_filter", "true")
            .text("beam_size", defaults::WHISPER_BEAM_SIZE.to_string())
            .text("response_format", "verbose_json");
        let hint = language
            .map(str::to_string)
            .unwrap_or_else(|| settings.language.clone());
        if !hint.is_empty() {
            form = form.text("language", hint);
        }

        let response = self
            .client
            .post(transcribe_endpoint(&settings.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    Error::UpstreamUnavailable(
                        "Cannot connect to the speech server. Is it running?".to_string(),
                    )
                } else {
                    Error::Transcription(format!("Transcription request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transcription(format!(
                "Speech server returned {}: {}",
                status, body
            )));
        }

        let result: VerboseTranscription = response
            .json()
            .await
            .map_err(|e| Error::Transcription(format!("Failed to parse transcription: {}", e)))?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            subsystem = "inference",
            component = "whisper",
            op = "transcribe",
            model = %settings.model,
            text_len = result.text.len(),
            language = ?result.language,
            duration_ms = elapsed,
            "Transcription finished"
        );
        if elapsed > 30_000 {
            warn!(
                subsystem = "inference",
                component = "whisper",
                duration_ms = elapsed,
                slow = true,
                "Slow transcription"
            );
        }

        Ok(SpeechTranscript {
            text: result.text,
            language: result.language,
            confidence: result.language_probability,
        })
    }
}
