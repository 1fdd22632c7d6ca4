//! Core data model for lingua-tutor.
//!
//! Entity shapes mirror the relational schema: chats own ordered messages,
//! documents supply study context, categories organize chats, and grammar
//! rules record what the learner has covered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

// =============================================================================
// CHAT
// =============================================================================

/// Conversation purpose classifier; selects the system prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    FreeTalk,
    Grammar,
    Document,
}

impl std::fmt::Display for ChatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FreeTalk => write!(f, "free_talk"),
            Self::Grammar => write!(f, "grammar"),
            Self::Document => write!(f, "document"),
        }
    }
}

impl std::str::FromStr for ChatMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "free_talk" => Ok(Self::FreeTalk),
            "grammar" => Ok(Self::Grammar),
            "document" => Ok(Self::Document),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown chat mode: {}",
                other
            ))),
        }
    }
}

/// A conversation with the tutor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub mode: ChatMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// JSON blob; document-mode chats store `{"document_id": "<uuid>"}` here.
    pub metadata: Option<JsonValue>,
}

impl Chat {
    /// Document referenced by this chat's metadata, if any.
    pub fn document_id(&self) -> Option<Uuid> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("document_id"))
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
    }
}

// =============================================================================
// MESSAGE
// =============================================================================

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for MessageRole {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "system" => Ok(Self::System),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown message role: {}",
                other
            ))),
        }
    }
}

/// A persisted conversation turn. Immutable once created; ordered by
/// `created_at` within a chat — that order is the history sent to the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// JSON blob; assistant turns may store `{"grammar_detected": {...}}`.
    pub metadata: Option<JsonValue>,
}

/// Provider-agnostic conversation turn, the unit the Provider Adapter
/// translates into each vendor's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

impl From<&Message> for ChatTurn {
    fn from(m: &Message) -> Self {
        Self {
            role: m.role,
            content: m.content.clone(),
        }
    }
}

// =============================================================================
// GRAMMAR
// =============================================================================

/// Structured annotation parsed from an assistant reply's inline marker.
/// Ephemeral; attached to the assistant message as metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarDetection {
    pub rule_name: String,
    pub explanation: String,
}

/// A grammar rule the learner has studied or saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarRule {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub examples: Option<String>,
    /// Chat the rule was detected in, if any.
    pub chat_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// CATEGORY
// =============================================================================

/// Kind of category used to organize chats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Topic,
    Grammar,
    Document,
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Topic => write!(f, "topic"),
            Self::Grammar => write!(f, "grammar"),
            Self::Document => write!(f, "document"),
        }
    }
}

impl std::str::FromStr for CategoryKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "topic" => Ok(Self::Topic),
            "grammar" => Ok(Self::Grammar),
            "document" => Ok(Self::Document),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown category kind: {}",
                other
            ))),
        }
    }
}

/// A grouping of chats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    pub created_at: DateTime<Utc>,
    pub metadata: Option<JsonValue>,
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// An uploaded study document with its extracted plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// TRANSCRIPTION
// =============================================================================

/// Result of the transcription pipeline (ephemeral).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionOutcome {
    /// Text after the optional LLM correction step.
    pub corrected_text: String,
    /// Raw speech-to-text output.
    pub original_text: String,
    /// Detected language (ISO 639-1 code).
    pub detected_language: Option<String>,
    /// Language-detection probability from the speech engine.
    pub confidence: Option<f64>,
    /// Whether the correction step changed the text.
    pub was_corrected: bool,
}

/// Raw output of the speech engine before correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechTranscript {
    pub text: String,
    /// Detected language (ISO 639-1 code).
    pub language: Option<String>,
    /// Language-detection probability.
    pub confidence: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_mode_round_trip() {
        for (mode, s) in [
            (ChatMode::FreeTalk, "free_talk"),
            (ChatMode::Grammar, "grammar"),
            (ChatMode::Document, "document"),
        ] {
            assert_eq!(mode.to_string(), s);
            assert_eq!(s.parse::<ChatMode>().unwrap(), mode);
        }
    }

    #[test]
    fn chat_mode_unknown_rejected() {
        assert!("vocabulary".parse::<ChatMode>().is_err());
    }

    #[test]
    fn chat_mode_serde_snake_case() {
        let json = serde_json::to_string(&ChatMode::FreeTalk).unwrap();
        assert_eq!(json, "\"free_talk\"");
    }

    #[test]
    fn message_role_round_trip() {
        for (role, s) in [
            (MessageRole::User, "user"),
            (MessageRole::Assistant, "assistant"),
            (MessageRole::System, "system"),
        ] {
            assert_eq!(role.to_string(), s);
            assert_eq!(s.parse::<MessageRole>().unwrap(), role);
        }
    }

    #[test]
    fn chat_document_id_from_metadata() {
        let doc_id = Uuid::new_v4();
        let chat = Chat {
            id: Uuid::new_v4(),
            category_id: None,
            title: "Vokabeln".to_string(),
            mode: ChatMode::Document,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            metadata: Some(serde_json::json!({ "document_id": doc_id.to_string() })),
        };
        assert_eq!(chat.document_id(), Some(doc_id));
    }

    #[test]
    fn chat_document_id_absent_or_malformed() {
        let mut chat = Chat {
            id: Uuid::new_v4(),
            category_id: None,
            title: "t".to_string(),
            mode: ChatMode::Document,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            metadata: None,
        };
        assert_eq!(chat.document_id(), None);

        chat.metadata = Some(serde_json::json!({ "document_id": "not-a-uuid" }));
        assert_eq!(chat.document_id(), None);
    }

    #[test]
    fn chat_turn_constructors() {
        let turn = ChatTurn::system("You are helpful");
        assert_eq!(turn.role, MessageRole::System);
        assert_eq!(turn.content, "You are helpful");
        assert_eq!(ChatTurn::user("Hi").role, MessageRole::User);
        assert_eq!(ChatTurn::assistant("Hallo").role, MessageRole::Assistant);
    }

    #[test]
    fn chat_turn_from_message() {
        let msg = Message {
            id: Uuid::new_v4(),
            chat_id: Uuid::new_v4(),
            role: MessageRole::User,
            content: "Wie geht's?".to_string(),
            created_at: Utc::now(),
            metadata: None,
        };
        let turn = ChatTurn::from(&msg);
        assert_eq!(turn.role, MessageRole::User);
        assert_eq!(turn.content, "Wie geht's?");
    }

    #[test]
    fn grammar_detection_serialization() {
        let det = GrammarDetection {
            rule_name: "Dative Case".to_string(),
            explanation: "Used after 'mit'".to_string(),
        };
        let json = serde_json::to_value(&det).unwrap();
        assert_eq!(json["rule_name"], "Dative Case");
        assert_eq!(json["explanation"], "Used after 'mit'");

        let back: GrammarDetection = serde_json::from_value(json).unwrap();
        assert_eq!(back, det);
    }

    #[test]
    fn transcription_outcome_serialization() {
        let outcome = TranscriptionOutcome {
            corrected_text: "Ich mag Hobbys.".to_string(),
            original_text: "Ich mag Robys.".to_string(),
            detected_language: Some("de".to_string()),
            confidence: Some(0.97),
            was_corrected: true,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["was_corrected"], true);
        assert_eq!(json["detected_language"], "de");
    }
}
