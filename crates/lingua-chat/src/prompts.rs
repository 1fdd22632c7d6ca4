//! System prompts and prompt builders for the tutoring modes.

use lingua_core::{defaults, ChatMode, ChatTurn, MessageRole};

/// Free-talk tutoring prompt. Instructs the model to emit the grammar
/// marker the orchestrator extracts.
pub const FREE_TALK_PROMPT: &str = "You are a friendly and encouraging language teacher. Your role is to:
1. Help the user practice conversation on various topics
2. Gently correct grammar mistakes when they occur
3. When you notice a grammar rule the user might benefit from learning, mention it and ask if they'd like to explore it further
4. Keep the conversation natural and engaging
5. Adapt to the user's level

When you detect a grammar issue, format it like this:
[GRAMMAR_DETECTED: rule_name | brief_explanation]

Then continue the conversation naturally. The app will use this to offer creating a grammar lesson.";

/// Focused grammar-lesson prompt.
pub const GRAMMAR_PROMPT: &str = "You are a language teacher focused on teaching a specific grammar rule. Your role is to:
1. Explain the grammar rule clearly with examples
2. Create practice exercises
3. Provide feedback on the user's attempts
4. Use progressive difficulty
5. Celebrate progress and encourage the learner

Structure your lessons with:
- Clear explanation
- Multiple examples
- Practice exercises
- Corrections with explanations";

/// Document-study prompt; the document body is appended separately.
pub const DOCUMENT_PROMPT: &str = "You are a language teacher helping the user learn vocabulary and sentence structures from a specific document. Your role is to:
1. Create conversations using words and phrases from the provided content
2. Quiz the user on vocabulary
3. Create fill-in-the-blank exercises
4. Use the words in new contexts
5. Build up from individual words to full sentences

The document content will be provided. Focus on helping the user internalize the vocabulary and structures naturally.";

/// System prompt for a chat mode.
pub fn system_prompt(mode: ChatMode) -> &'static str {
    match mode {
        ChatMode::FreeTalk => FREE_TALK_PROMPT,
        ChatMode::Grammar => GRAMMAR_PROMPT,
        ChatMode::Document => DOCUMENT_PROMPT,
    }
}

/// Build the full system turn for a chat, appending the document body in
/// document mode.
pub fn system_turn(mode: ChatMode, document_content: Option<&str>) -> ChatTurn {
    let mut prompt = system_prompt(mode).to_string();
    if let Some(content) = document_content {
        prompt.push_str("\n\n[DOCUMENT CONTENT]\n");
        prompt.push_str(content);
    }
    ChatTurn::system(prompt)
}

/// Human-readable language name for an ISO 639-1 code. Unrecognized codes
/// fall back to the default tutoring language.
pub fn language_name(code: &str) -> &'static str {
    match code {
        "de" => "German",
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "it" => "Italian",
        "pt" => "Portuguese",
        "nl" => "Dutch",
        "pl" => "Polish",
        "ru" => "Russian",
        "ja" => "Japanese",
        "zh" => "Chinese",
        "ko" => "Korean",
        _ => defaults::FALLBACK_LANGUAGE_NAME,
    }
}

/// Build the transcription-correction prompt. Recent history disambiguates
/// misheard words; the model is told to output only the corrected text.
pub fn correction_prompt(text: &str, language: &str, history: &[ChatTurn]) -> String {
    let mut context_section = String::new();
    if !history.is_empty() {
        let recent = &history[history.len().saturating_sub(defaults::CORRECTION_CONTEXT_TURNS)..];
        let lines: Vec<String> = recent
            .iter()
            .map(|turn| {
                let label = match turn.role {
                    MessageRole::User => "User",
                    _ => "Assistant",
                };
                format!("{}: {}", label, turn.content)
            })
            .collect();
        context_section = format!(
            "\nRecent conversation context:\n---\n{}\n---\n\nUse this context to better understand what words the user likely said.\n",
            lines.join("\n")
        );
    }

    format!(
        "You are a {language} language transcription corrector. \n\
The following text was transcribed from speech and may contain errors due to accent or pronunciation issues.\n\
{context_section}\n\
Your task:\n\
1. Fix any misheard words based on context (e.g., \"Robys\" should be \"Hobbys\" if discussing hobbies)\n\
2. Fix spelling errors\n\
3. Keep the original meaning and intent\n\
4. Do NOT translate - keep it in {language}\n\
5. Do NOT add explanations - only output the corrected text\n\
6. If the text seems contextually correct, return it unchanged\n\
\n\
Transcribed text: {text}\n\
\n\
Corrected text:"
    )
}
