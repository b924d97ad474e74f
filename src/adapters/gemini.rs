use crate::adapters::failure;
use crate::config::ProviderSettings;
use crate::domain::model::CompletionParams;
use crate::domain::ports::CompletionProvider;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(settings: &ProviderSettings, client: Client) -> Self {
        Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        params: &CompletionParams,
    ) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: system_prompt,
                }],
            },
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: user_text }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: params.max_tokens,
                temperature: params.temperature,
            },
        };

        tracing::debug!(provider = "Gemini", %url, "Sending generateContent request");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.trim())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(failure::from_response(self.name(), response).await);
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ProviderKind;
    use crate::utils::error::RelayError;
    use httpmock::prelude::*;

    fn provider_for(server: &MockServer) -> GeminiProvider {
        let settings = ProviderSettings {
            kind: ProviderKind::Gemini,
            api_key: "gm-test".to_string(),
            base_url: server.url("/v1beta"),
            model: "gemini-1.5-flash".to_string(),
            timeout_seconds: None,
        };
        GeminiProvider::new(&settings, Client::new())
    }

    #[tokio::test]
    async fn test_complete_joins_candidate_parts() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-1.5-flash:generateContent")
                .header("x-goog-api-key", "gm-test")
                .json_body(serde_json::json!({
                    "systemInstruction": {"parts": [{"text": "be funny"}]},
                    "contents": [{"role": "user", "parts": [{"text": "I broke the printer"}]}],
                    "generationConfig": {"maxOutputTokens": 150, "temperature": 0.8}
                }));
            then.status(200).json_body(serde_json::json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "It was "}, {"text": "already haunted."}]},
                    "finishReason": "STOP"
                }]
            }));
        });

        let text = provider_for(&server)
            .complete("be funny", "I broke the printer", &CompletionParams::default())
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(text, "It was already haunted.");
    }

    #[tokio::test]
    async fn test_blocked_prompt_returns_empty_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-1.5-flash:generateContent");
            then.status(200).json_body(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            }));
        });

        let text = provider_for(&server)
            .complete("prompt", "problem", &CompletionParams::default())
            .await
            .unwrap();

        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_key_reason_maps_to_auth_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-1.5-flash:generateContent");
            then.status(400).json_body(serde_json::json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT",
                    "details": [{"@type": "type.googleapis.com/google.rpc.ErrorInfo", "reason": "API_KEY_INVALID"}]
                }
            }));
        });

        let err = provider_for(&server)
            .complete("prompt", "problem", &CompletionParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::ProviderAuthError { .. }));
    }
}
