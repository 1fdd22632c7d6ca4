//! Deterministic backends for tests.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use lingua_core::{ChatBackend, ChatTurn, Error, Result, SpeechBackend, SpeechTranscript};

/// Chat backend that replays scripted replies and records every call.
pub struct MockChatBackend {
    replies: Mutex<Vec<String>>,
    calls: Mutex<Vec<Vec<ChatTurn>>>,
    fail: bool,
}

impl MockChatBackend {
    /// Replies are served in the given order; the last one repeats once
    /// the script runs out.
    pub fn with_replies(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(String::from).collect()),
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Backend whose every call fails with an upstream error.
    pub fn failing() -> Self {
        Self {
            replies: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Turns passed to each recorded call, in order.
    pub fn calls(&self) -> Vec<Vec<ChatTurn>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String> {
        self.calls.lock().unwrap().push(turns.to_vec());
        if self.fail {
            return Err(Error::Upstream("mock backend failure".to_string()));
        }
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            Ok(replies.remove(0))
        } else {
            replies
                .first()
                .cloned()
                .ok_or_else(|| Error::Upstream("mock backend has no reply".to_string()))
        }
    }
}

/// Speech backend returning a fixed transcript.
pub struct MockSpeechBackend {
    transcript: SpeechTranscript,
    fail: bool,
}

impl MockSpeechBackend {
    pub fn with_transcript(text: &str, language: Option<&str>, confidence: Option<f64>) -> Self {
        Self {
            transcript: SpeechTranscript {
                text: text.to_string(),
                language: language.map(String::from),
                confidence,
            },
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            transcript: SpeechTranscript {
                text: String::new(),
                language: None,
                confidence: None,
            },
            fail: true,
        }
    }
}

#[async_trait]
impl SpeechBackend for MockSpeechBackend {
    async fn transcribe(&self, _path: &Path, _language: Option<&str>) -> Result<SpeechTranscript> {
        if self.fail {
            return Err(Error::Transcription("mock transcription failure".to_string()));
        }
        Ok(self.transcript.clone())
    }
}
