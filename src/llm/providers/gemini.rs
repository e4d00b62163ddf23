//! Google Gemini provider (`v1beta/models/{model}:generateContent`).
//!
//! Single-turn only: the caller flattens persona and history into one prompt
//! string, which is sent as a lone `user` content. Wire types stay private.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::llm::{LlmResponse, LlmUsage, ProviderError};

#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_base_url: String,
    model: String,
    temperature: f32,
    api_key: String,
}

// Never print the key.
impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_base_url", &self.api_base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    pub fn new(
        api_base_url: String,
        model: String,
        temperature: f32,
        timeout_seconds: u64,
        api_key: String,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            model,
            temperature,
            api_key,
        })
    }

    fn generate_content_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base_url, self.model)
    }

    pub async fn complete(&self, prompt: &str) -> Result<LlmResponse, ProviderError> {
        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt.to_string() }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(self.temperature),
            }),
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "sending Gemini request");
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "full Gemini request payload");
        }

        let response = self
            .client
            .post(self.generate_content_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "Gemini HTTP request failed (transport)");
                ProviderError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(env) => format!("HTTP {status}: {}", env.error.message),
                Err(_) => format!("HTTP {status}: {body}"),
            };
            error!(%status, %message, "Gemini request returned HTTP error");
            return Err(ProviderError::Request(message));
        }

        let parsed = response.json::<GenerateContentResponse>().await.map_err(|e| {
            error!(error = %e, "failed to deserialize Gemini response");
            ProviderError::Request(format!("failed to parse response body: {e}"))
        })?;

        parse_response(parsed)
    }
}

fn parse_response(parsed: GenerateContentResponse) -> Result<LlmResponse, ProviderError> {
    debug!(candidates = parsed.candidates.len(), "received Gemini response");

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ProviderError::Request("empty or missing content in response".into()))?;

    let usage = parsed.usage_metadata.map(|u| LlmUsage {
        input_tokens: u.prompt_token_count,
        output_tokens: u.candidates_token_count,
    });

    Ok(LlmResponse { text, usage })
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GeminiProvider {
        GeminiProvider::new(
            "https://generativelanguage.googleapis.com/".into(),
            "gemini-2.5-flash".into(),
            0.7,
            5,
            "secret-key".into(),
        )
        .unwrap()
    }

    #[test]
    fn url_includes_model_without_key() {
        let url = provider().generate_content_url();
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(!url.contains("secret-key"));
    }

    #[test]
    fn debug_hides_key() {
        let debug = format!("{:?}", provider());
        assert!(debug.contains("gemini-2.5-flash"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn request_serializes_camel_case() {
        let req = GenerateContentRequest {
            contents: vec![Content {
                role: "user".into(),
                parts: vec![Part { text: "oi".into() }],
            }],
            generation_config: Some(GenerationConfig { temperature: Some(0.5) }),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "oi");
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn parses_text_and_usage() {
        let body = r#"{
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Olá, "}, {"text": "Kley! "}]}}],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3}
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let resp = parse_response(parsed).unwrap();
        assert_eq!(resp.text, "Olá, Kley!");
        assert_eq!(resp.usage, Some(LlmUsage { input_tokens: 12, output_tokens: 3 }));
    }

    #[test]
    fn blocked_prompt_is_an_error() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert!(parse_response(parsed).is_err());
    }

    #[tokio::test]
    async fn unreachable_endpoint_errors() {
        let p = GeminiProvider::new("http://127.0.0.1:9".into(), "m".into(), 0.0, 1, "k".into())
            .unwrap();
        let err = p.complete("oi").await.unwrap_err();
        assert!(matches!(err, ProviderError::Request(_)));
    }
}
