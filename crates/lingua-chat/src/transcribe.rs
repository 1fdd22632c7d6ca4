//! Speech transcription pipeline.
//!
//! Uploaded audio is spooled to a temp file for the speech backend, then
//! optionally run through an LLM correction pass that uses recent chat
//! context to fix mishearings. Correction is best-effort: any failure
//! there falls back to the raw transcription.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use lingua_core::{
    ChatBackend, ChatTurn, Error, Result, SpeechBackend, TranscriptionOutcome,
};
use lingua_inference::ConfigService;

use crate::prompts;

/// File extensions accepted as audio uploads.
const AUDIO_EXTENSIONS: &[&str] = &[".wav", ".mp3", ".m4a", ".ogg", ".webm", ".flac", ".mp4"];

/// MIME types accepted as audio uploads.
pub const SUPPORTED_AUDIO_FORMATS: &[&str] = &[
    "audio/wav",
    "audio/wave",
    "audio/x-wav",
    "audio/mp3",
    "audio/mpeg",
    "audio/mp4",
    "audio/m4a",
    "audio/x-m4a",
    "audio/ogg",
    "audio/webm",
    "audio/flac",
];

/// Whether an upload looks like audio, by content type or file extension.
pub fn is_audio_upload(content_type: Option<&str>, filename: Option<&str>) -> bool {
    if let Some(ct) = content_type {
        if ct.starts_with("audio/") || ct.starts_with("video/") {
            return true;
        }
    }
    if let Some(name) = filename {
        let lower = name.to_lowercase();
        return AUDIO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));
    }
    false
}

#[derive(Clone)]
pub struct TranscriptionPipeline {
    speech: Arc<dyn SpeechBackend>,
    backend: Arc<dyn ChatBackend>,
    config: Arc<ConfigService>,
}

impl TranscriptionPipeline {
    pub fn new(
        speech: Arc<dyn SpeechBackend>,
        backend: Arc<dyn ChatBackend>,
        config: Arc<ConfigService>,
    ) -> Self {
        Self {
            speech,
            backend,
            config,
        }
    }

    /// Transcribe audio bytes, optionally correcting the result with the
    /// LLM and the given conversation history as context.
    pub async fn transcribe(
        &self,
        audio: &[u8],
        filename_hint: Option<&str>,
        language_hint: Option<&str>,
        correct: bool,
        history: &[ChatTurn],
    ) -> Result<TranscriptionOutcome> {
        if audio.is_empty() {
            return Err(Error::InvalidInput("Audio upload is empty".to_string()));
        }

        let start = Instant::now();
        let temp = spool_to_temp(audio, filename_hint)?;
        let transcript = self.speech.transcribe(temp.path(), language_hint).await?;

        let original_text = transcript.text.clone();
        let mut corrected_text = original_text.clone();

        if correct && !original_text.trim().is_empty() {
            // Detected language, then the request hint, then the configured
            // speech default.
            let code = match transcript.language.as_deref().or(language_hint) {
                Some(code) => code.to_string(),
                None => self.config.whisper().await.language,
            };
            let language = prompts::language_name(&code);
            corrected_text = self
                .correct_transcription(&original_text, language, history)
                .await;
        }

        let was_corrected = corrected_text != original_text;
        info!(
            subsystem = "chat",
            op = "transcribe",
            text_len = original_text.len(),
            language = ?transcript.language,
            corrected = was_corrected,
            duration_ms = start.elapsed().as_millis() as u64,
            "Transcription pipeline complete"
        );

        Ok(TranscriptionOutcome {
            corrected_text,
            original_text,
            detected_language: transcript.language,
            confidence: transcript.confidence,
            was_corrected,
        })
    }

    /// LLM correction pass. Returns the original text whenever the call
    /// fails or produces nothing usable.
    async fn correct_transcription(
        &self,
        text: &str,
        language: &str,
        history: &[ChatTurn],
    ) -> String {
        let prompt = prompts::correction_prompt(text, language, history);
        match self.backend.complete(&[ChatTurn::user(prompt)]).await {
            Ok(reply) => {
                let cleaned = reply
                    .trim()
                    .trim_matches(|c| c == '"' || c == '\'')
                    .to_string();
                if cleaned.is_empty() {
                    text.to_string()
                } else {
                    cleaned
                }
            }
            Err(e) => {
                warn!(
                    subsystem = "chat",
                    op = "correct_transcription",
                    error = %e,
                    "Correction failed, keeping raw transcription"
                );
                text.to_string()
            }
        }
    }
}

/// Write upload bytes to a named temp file, keeping the extension so the
/// speech backend can sniff the container format.
fn spool_to_temp(audio: &[u8], filename_hint: Option<&str>) -> Result<tempfile::NamedTempFile> {
    let suffix = filename_hint
        .and_then(|name| {
            Path::new(name)
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
        })
        .unwrap_or_else(|| ".wav".to_string());

    let mut temp = tempfile::Builder::new().suffix(&suffix).tempfile()?;
    temp.write_all(audio)?;
    temp.flush()?;
    debug!(
        subsystem = "chat",
        op = "spool_audio",
        bytes = audio.len(),
        suffix = %suffix,
        "Audio spooled to temp file"
    );
    Ok(temp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingua_inference::mock::{MockChatBackend, MockSpeechBackend};
    use lingua_inference::{ProviderSettings, WhisperSettings};

    fn pipeline(
        speech: MockSpeechBackend,
        backend: MockChatBackend,
    ) -> (TranscriptionPipeline, Arc<MockChatBackend>) {
        pipeline_with_whisper(speech, backend, WhisperSettings::default())
    }

    fn pipeline_with_whisper(
        speech: MockSpeechBackend,
        backend: MockChatBackend,
        whisper: WhisperSettings,
    ) -> (TranscriptionPipeline, Arc<MockChatBackend>) {
        let backend = Arc::new(backend);
        let config = Arc::new(ConfigService::new(ProviderSettings::default(), whisper));
        (
            TranscriptionPipeline::new(Arc::new(speech), backend.clone(), config),
            backend,
        )
    }

    #[tokio::test]
    async fn correct_false_returns_raw_transcription() {
        let (p, backend) = pipeline(
            MockSpeechBackend::with_transcript("Ich mag Robys.", Some("de"), Some(0.9)),
            MockChatBackend::with_replies(vec!["Ich mag Hobbys."]),
        );

        let outcome = p
            .transcribe(b"RIFF", Some("a.wav"), None, false, &[])
            .await
            .unwrap();
        assert_eq!(outcome.corrected_text, "Ich mag Robys.");
        assert_eq!(outcome.original_text, "Ich mag Robys.");
        assert!(!outcome.was_corrected);
        assert_eq!(outcome.detected_language.as_deref(), Some("de"));
        assert_eq!(outcome.confidence, Some(0.9));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn correction_replaces_text_and_flags_it() {
        let (p, backend) = pipeline(
            MockSpeechBackend::with_transcript("Ich mag Robys.", Some("de"), Some(0.9)),
            MockChatBackend::with_replies(vec!["Ich mag Hobbys."]),
        );

        let outcome = p
            .transcribe(b"RIFF", Some("a.wav"), None, true, &[])
            .await
            .unwrap();
        assert_eq!(outcome.corrected_text, "Ich mag Hobbys.");
        assert_eq!(outcome.original_text, "Ich mag Robys.");
        assert!(outcome.was_corrected);

        // The correction prompt names the detected language.
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0][0].content.contains("German language transcription corrector"));
        assert!(calls[0][0].content.contains("Transcribed text: Ich mag Robys."));
    }

    #[tokio::test]
    async fn quoted_correction_is_unwrapped() {
        let (p, _) = pipeline(
            MockSpeechBackend::with_transcript("Ich mag Robys.", Some("de"), None),
            MockChatBackend::with_replies(vec!["\"Ich mag Hobbys.\""]),
        );

        let outcome = p
            .transcribe(b"RIFF", None, None, true, &[])
            .await
            .unwrap();
        assert_eq!(outcome.corrected_text, "Ich mag Hobbys.");
        assert!(outcome.was_corrected);
    }

    #[tokio::test]
    async fn correction_failure_is_swallowed() {
        let (p, _) = pipeline(
            MockSpeechBackend::with_transcript("Hallo Welt", Some("de"), None),
            MockChatBackend::failing(),
        );

        let outcome = p
            .transcribe(b"RIFF", None, None, true, &[])
            .await
            .unwrap();
        assert_eq!(outcome.corrected_text, "Hallo Welt");
        assert!(!outcome.was_corrected);
    }

    #[tokio::test]
    async fn empty_correction_falls_back_to_original() {
        let (p, _) = pipeline(
            MockSpeechBackend::with_transcript("Hallo", Some("de"), None),
            MockChatBackend::with_replies(vec!["  "]),
        );

        let outcome = p
            .transcribe(b"RIFF", None, None, true, &[])
            .await
            .unwrap();
        assert_eq!(outcome.corrected_text, "Hallo");
        assert!(!outcome.was_corrected);
    }

    #[tokio::test]
    async fn identical_correction_reports_uncorrected() {
        let (p, _) = pipeline(
            MockSpeechBackend::with_transcript("Alles gut.", Some("de"), None),
            MockChatBackend::with_replies(vec!["Alles gut."]),
        );

        let outcome = p
            .transcribe(b"RIFF", None, None, true, &[])
            .await
            .unwrap();
        assert!(!outcome.was_corrected);
    }

    #[tokio::test]
    async fn empty_transcription_skips_correction() {
        let (p, backend) = pipeline(
            MockSpeechBackend::with_transcript("  ", None, None),
            MockChatBackend::with_replies(vec!["should not be called"]),
        );

        let outcome = p
            .transcribe(b"RIFF", None, None, true, &[])
            .await
            .unwrap();
        assert_eq!(outcome.corrected_text, "  ");
        assert!(backend.calls().is_empty());
        assert!(!outcome.was_corrected);
    }

    #[tokio::test]
    async fn empty_audio_is_rejected() {
        let (p, _) = pipeline(
            MockSpeechBackend::with_transcript("x", None, None),
            MockChatBackend::with_replies(vec!["x"]),
        );
        let err = p.transcribe(b"", None, None, false, &[]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn speech_failure_propagates() {
        let (p, _) = pipeline(
            MockSpeechBackend::failing(),
            MockChatBackend::with_replies(vec!["x"]),
        );
        let err = p
            .transcribe(b"RIFF", None, None, true, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transcription(_)));
    }

    #[tokio::test]
    async fn history_is_threaded_into_the_prompt() {
        let (p, backend) = pipeline(
            MockSpeechBackend::with_transcript("Robys", Some("de"), None),
            MockChatBackend::with_replies(vec!["Hobbys"]),
        );

        let history = vec![
            ChatTurn::user("Was sind deine Hobbys?"),
            ChatTurn::assistant("Ich lese gern."),
        ];
        p.transcribe(b"RIFF", None, None, true, &history)
            .await
            .unwrap();

        let prompt = &backend.calls()[0][0].content;
        assert!(prompt.contains("User: Was sind deine Hobbys?"));
        assert!(prompt.contains("Assistant: Ich lese gern."));
    }

    #[tokio::test]
    async fn configured_default_language_backs_the_correction_prompt() {
        let (p, backend) = pipeline_with_whisper(
            MockSpeechBackend::with_transcript("Bonjour", None, None),
            MockChatBackend::with_replies(vec!["Bonjour"]),
            WhisperSettings {
                language: "fr".to_string(),
                ..WhisperSettings::default()
            },
        );

        p.transcribe(b"RIFF", None, None, true, &[]).await.unwrap();

        let prompt = &backend.calls()[0][0].content;
        assert!(prompt.contains("French language transcription corrector"));
    }

    #[tokio::test]
    async fn detected_language_beats_the_configured_default() {
        let (p, backend) = pipeline_with_whisper(
            MockSpeechBackend::with_transcript("Hola", Some("es"), None),
            MockChatBackend::with_replies(vec!["Hola"]),
            WhisperSettings {
                language: "fr".to_string(),
                ..WhisperSettings::default()
            },
        );

        p.transcribe(b"RIFF", None, None, true, &[]).await.unwrap();

        let prompt = &backend.calls()[0][0].content;
        assert!(prompt.contains("Spanish language transcription corrector"));
    }

    #[test]
    fn audio_validation_by_mime_and_extension() {
        assert!(is_audio_upload(Some("audio/webm"), None));
        assert!(is_audio_upload(Some("video/mp4"), None));
        assert!(is_audio_upload(None, Some("Aufnahme.WAV")));
        assert!(is_audio_upload(Some("application/json"), Some("a.ogg")));
        assert!(!is_audio_upload(Some("text/plain"), Some("notes.txt")));
        assert!(!is_audio_upload(None, None));
    }
}
