//! Audio transcription handlers.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use lingua_chat::transcribe::is_audio_upload;
use lingua_chat::SUPPORTED_AUDIO_FORMATS;
use lingua_core::defaults;

use crate::{ApiError, AppState};

/// Parsed multipart form shared by both audio endpoints.
struct AudioUpload {
    bytes: Vec<u8>,
    filename: Option<String>,
    content_type: Option<String>,
    language: Option<String>,
    chat_id: Option<Uuid>,
    detect_grammar: bool,
    correct: Option<bool>,
}

async fn read_upload(mut multipart: Multipart) -> Result<AudioUpload, ApiError> {
    let mut upload = AudioUpload {
        bytes: Vec::new(),
        filename: None,
        content_type: None,
        language: None,
        chat_id: None,
        detect_grammar: true,
        correct: None,
    };
    let mut got_file = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("audio") => {
                upload.filename = field.file_name().map(|n| n.to_string());
                upload.content_type = field.content_type().map(|c| c.to_string());
                upload.bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?
                    .to_vec();
                got_file = true;
            }
            Some("language") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
                if !value.trim().is_empty() {
                    upload.language = Some(value.trim().to_string());
                }
            }
            Some("chat_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
                upload.chat_id = Some(
                    Uuid::parse_str(value.trim())
                        .map_err(|_| ApiError::BadRequest("Invalid chat_id".to_string()))?,
                );
            }
            Some("detect_grammar") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
                upload.detect_grammar = value.trim() != "false";
            }
            Some("correct") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
                upload.correct = Some(value.trim() == "true");
            }
            _ => {}
        }
    }

    if !got_file {
        return Err(ApiError::BadRequest("Missing audio file in multipart form".to_string()));
    }
    if upload.bytes.len() > defaults::MAX_AUDIO_SIZE_BYTES {
        return Err(ApiError::BadRequest(format!(
            "Audio upload exceeds {} MB limit",
            defaults::MAX_AUDIO_SIZE_BYTES / (1024 * 1024)
        )));
    }
    if !is_audio_upload(upload.content_type.as_deref(), upload.filename.as_deref()) {
        return Err(ApiError::BadRequest(format!(
            "Invalid audio file. Supported formats: {}",
            SUPPORTED_AUDIO_FORMATS.join(", ")
        )));
    }
    Ok(upload)
}

#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
    pub original_text: String,
    pub language: Option<String>,
    pub confidence: Option<f64>,
    pub was_corrected: bool,
}

/// Transcribe an audio upload. Correction is off by default here; without
/// chat context it tends to hallucinate.
pub async fn transcribe(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    let upload = read_upload(multipart).await?;
    let correct = upload.correct.unwrap_or(false);

    let outcome = state
        .pipeline
        .transcribe(
            &upload.bytes,
            upload.filename.as_deref(),
            upload.language.as_deref(),
            correct,
            &[],
        )
        .await?;

    Ok(Json(TranscriptionResponse {
        text: outcome.corrected_text,
        original_text: outcome.original_text,
        language: outcome.detected_language,
        confidence: outcome.confidence,
        was_corrected: outcome.was_corrected,
    }))
}

/// Transcribe an audio upload and send the result as a chat message in one
/// round. Chat history feeds the correction pass.
pub async fn transcribe_and_send(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let upload = read_upload(multipart).await?;
    let chat_id = upload
        .chat_id
        .ok_or_else(|| ApiError::BadRequest("Missing chat_id".to_string()))?;
    let correct = upload.correct.unwrap_or(true);

    let history = if correct {
        state.chats.history(chat_id).await?
    } else {
        Vec::new()
    };

    let outcome = state
        .pipeline
        .transcribe(
            &upload.bytes,
            upload.filename.as_deref(),
            upload.language.as_deref(),
            correct,
            &history,
        )
        .await?;

    if outcome.corrected_text.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Could not transcribe any speech from the audio".to_string(),
        ));
    }

    let chat_response = state
        .chats
        .send_message(chat_id, outcome.corrected_text.clone(), upload.detect_grammar)
        .await?;

    Ok(Json(serde_json::json!({
        "transcription": TranscriptionResponse {
            text: outcome.corrected_text,
            original_text: outcome.original_text,
            language: outcome.detected_language,
            confidence: outcome.confidence,
            was_corrected: outcome.was_corrected,
        },
        "chat_response": chat_response,
    })))
}

pub async fn formats() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "formats": SUPPORTED_AUDIO_FORMATS,
        "max_size_mb": defaults::MAX_AUDIO_SIZE_BYTES / (1024 * 1024),
        "correction_enabled": true,
        "correction_info": "LLM-based correction fixes accent and pronunciation errors",
    }))
}
