//! Gemini generateContent translation.
//!
//! Gemini has no assistant role: assistant turns map to "model", and
//! system turns are hoisted into `systemInstruction`. The key travels as a
//! query parameter, not a header, and is mandatory.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lingua_core::{defaults, ChatTurn, Error, MessageRole, Result};

use crate::provider::ProviderSettings;

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Map turns into Gemini contents plus an optional system instruction.
fn build_request(turns: &[ChatTurn]) -> GenerateContentRequest<'_> {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();
    for turn in turns {
        match turn.role {
            MessageRole::System => system_parts.push(Part {
                text: turn.content.clone(),
            }),
            MessageRole::User => contents.push(Content {
                role: "user",
                parts: vec![Part {
                    text: turn.content.clone(),
                }],
            }),
            MessageRole::Assistant => contents.push(Content {
                role: "model",
                parts: vec![Part {
                    text: turn.content.clone(),
                }],
            }),
        }
    }

    GenerateContentRequest {
        contents,
        system_instruction: if system_parts.is_empty() {
            None
        } else {
            Some(SystemInstruction {
                parts: system_parts,
            })
        },
        generation_config: GenerationConfig {
            temperature: defaults::GEMINI_TEMPERATURE,
            top_k: defaults::GEMINI_TOP_K,
            top_p: defaults::GEMINI_TOP_P,
            max_output_tokens: defaults::GEMINI_MAX_OUTPUT_TOKENS,
        },
    }
}

pub(crate) async fn invoke(
    client: &Client,
    settings: &ProviderSettings,
    turns: &[ChatTurn],
) -> Result<String> {
    invoke_at(client, defaults::GEMINI_URL, settings, turns).await
}

pub(crate) async fn invoke_at(
    client: &Client,
    base: &str,
    settings: &ProviderSettings,
    turns: &[ChatTurn],
) -> Result<String> {
    let api_key = settings.resolve_api_key().ok_or_else(|| {
        Error::MissingCredential(
            "Gemini API key required. Set GEMINI_API_KEY or configure one.".to_string(),
        )
    })?;

    let model = if settings.model.is_empty() {
        defaults::GEMINI_FALLBACK_MODEL
    } else {
        &settings.model
    };

    let request = build_request(turns);
    let url = format!("{}/{}:generateContent", base.trim_end_matches('/'), model);

    let response = client
        .post(&url)
        .query(&[("key", api_key.as_str())])
        .json(&request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(Error::Upstream(format!(
            "Gemini returned {}: {}",
            status, detail
        )));
    }

    let result: GenerateContentResponse = response
        .json()
        .await
        .map_err(|e| Error::Upstream(format!("Failed to parse Gemini response: {}", e)))?;

    let content = result
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .unwrap_or_default();

    debug!(
        subsystem = "inference",
        component = "gemini",
        op = "complete",
        model = %model,
        response_len = content.len(),
        "Completion finished"
    );
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_role_maps_to_model() {
        let turns = vec![
            ChatTurn::user("Hallo"),
            ChatTurn::assistant("Guten Tag!"),
            ChatTurn::user("Wie geht's?"),
        ];
        let request = build_request(&turns);
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[0].role, "user");
        assert_eq!(request.contents[1].role, "model");
        assert_eq!(request.contents[2].role, "user");
        assert!(request.system_instruction.is_none());
    }

    #[test]
    fn system_turns_become_system_instruction() {
        let turns = vec![ChatTurn::system("Be a tutor"), ChatTurn::user("Hi")];
        let request = build_request(&turns);
        assert_eq!(request.contents.len(), 1);
        let instruction = request.system_instruction.unwrap();
        assert_eq!(instruction.parts[0].text, "Be a tutor");
    }

    #[test]
    fn generation_config_serializes_camel_case() {
        let turns = [ChatTurn::user("Hi")];
        let request = build_request(&turns);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["temperature"], 0.7);
        assert_eq!(json["generationConfig"]["topK"], 40);
        assert_eq!(json["generationConfig"]["topP"], 0.95);
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 4096);
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hi");
    }

    #[test]
    fn response_extracts_first_candidate_part() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Sehr gut!"}], "role": "model"}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.candidates[0].content.parts[0].text, "Sehr gut!");
    }

    #[test]
    fn error_envelope_parses_nested_message() {
        let json = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.error.message, "API key not valid");
    }

    mod wire {
        use super::*;
        use crate::provider::ProviderKind;
        use reqwest::Client;
        use wiremock::matchers::{body_partial_json, method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn settings(model: &str) -> ProviderSettings {
            ProviderSettings {
                provider: ProviderKind::Gemini,
                model: model.to_string(),
                base_url: String::new(),
                api_key: Some("gm-test".to_string()),
            }
        }

        #[tokio::test]
        async fn key_travels_as_query_param_with_role_mapping() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/gemini-2.0-flash:generateContent"))
                .and(query_param("key", "gm-test"))
                .and(body_partial_json(serde_json::json!({
                    "contents": [
                        {"role": "user", "parts": [{"text": "Hallo"}]},
                        {"role": "model", "parts": [{"text": "Guten Tag!"}]},
                        {"role": "user", "parts": [{"text": "Danke"}]}
                    ],
                    "systemInstruction": {"parts": [{"text": "Be a tutor"}]},
                    "generationConfig": {"temperature": 0.7, "topK": 40, "topP": 0.95, "maxOutputTokens": 4096}
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "candidates": [
                        {"content": {"parts": [{"text": "Bitte!"}], "role": "model"}}
                    ]
                })))
                .expect(1)
                .mount(&server)
                .await;

            let turns = vec![
                ChatTurn::system("Be a tutor"),
                ChatTurn::user("Hallo"),
                ChatTurn::assistant("Guten Tag!"),
                ChatTurn::user("Danke"),
            ];
            let reply = invoke_at(
                &Client::new(),
                &server.uri(),
                &settings("gemini-2.0-flash"),
                &turns,
            )
            .await
            .unwrap();
            assert_eq!(reply, "Bitte!");
        }

        #[tokio::test]
        async fn empty_model_falls_back() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(format!(
                    "/{}:generateContent",
                    defaults::GEMINI_FALLBACK_MODEL
                )))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
                })))
                .expect(1)
                .mount(&server)
                .await;

            let turns = vec![ChatTurn::user("Hi")];
            let reply = invoke_at(&Client::new(), &server.uri(), &settings(""), &turns)
                .await
                .unwrap();
            assert_eq!(reply, "ok");
        }

        #[tokio::test]
        async fn upstream_error_surfaces_nested_message() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                    "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
                })))
                .mount(&server)
                .await;

            let turns = vec![ChatTurn::user("Hi")];
            let err = invoke_at(&Client::new(), &server.uri(), &settings("m"), &turns)
                .await
                .unwrap_err();
            match err {
                Error::Upstream(msg) => assert!(msg.contains("API key not valid")),
                other => panic!("expected Upstream, got {other}"),
            }
        }

        #[tokio::test]
        async fn missing_key_fails_before_any_request() {
            std::env::remove_var(defaults::ENV_GEMINI_API_KEY);
            let server = MockServer::start().await;
            let turns = vec![ChatTurn::user("Hi")];
            let mut s = settings("m");
            s.api_key = None;
            let err = invoke_at(&Client::new(), &server.uri(), &s, &turns)
                .await
                .unwrap_err();
            match err {
                Error::MissingCredential(_) => {}
                other => panic!("expected MissingCredential, got {other}"),
            }
        }
    }
}
