//! Grammar marker extraction.
//!
//! The free-talk prompt asks the model to flag teachable grammar issues
//! inline as `[GRAMMAR_DETECTED: rule | explanation]`. Extraction is
//! lenient: a malformed marker is left in place, and the reply text is
//! otherwise returned byte-for-byte with complete markers removed.

use std::sync::OnceLock;

use regex::Regex;

use lingua_core::GrammarDetection;

const MARKER_PREFIX: &str = "[GRAMMAR_DETECTED:";

fn marker_capture() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[GRAMMAR_DETECTED:\s*([^|\]]+)\s*\|\s*([^\]]+)\]").unwrap()
    })
}

fn marker_any() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[GRAMMAR_DETECTED:[^\]]+\]").unwrap())
}

/// Extract the first well-formed grammar marker and strip all complete
/// markers from the reply. Returns the cleaned reply and the detection,
/// if any.
pub fn extract(reply: &str) -> (String, Option<GrammarDetection>) {
    if !reply.contains(MARKER_PREFIX) {
        return (reply.to_string(), None);
    }

    let detection = marker_capture().captures(reply).map(|caps| GrammarDetection {
        rule_name: caps[1].trim().to_string(),
        explanation: caps[2].trim().to_string(),
    });

    if detection.is_none() {
        // Marker prefix present but never well-formed: leave the text alone.
        return (reply.to_string(), None);
    }

    let cleaned = marker_any().replace_all(reply, "").into_owned();
    (cleaned, detection)
}
