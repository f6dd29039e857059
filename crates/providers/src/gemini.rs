//! Google Gemini native provider implementation.
//!
//! Uses the Generative Language API (`models/{model}:generateContent`)
//! directly.
//!
//! Features:
//! - `x-goog-api-key` header authentication
//! - System messages sent as the top-level `systemInstruction`
//! - `temperature`, `topP`, `topK`, `maxOutputTokens` in `generationConfig`
//! - Blocked prompts and empty candidates surface as errors

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use skyline_core::error::ProviderError;
use skyline_core::message::{Message, Role};
use skyline_core::provider::*;
use tracing::debug;

use crate::http::{build_client, check_status, transport_error};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini `generateContent` provider.
pub struct GeminiProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            name: "gemini".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            client: build_client(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bound every request to `secs` seconds.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.client = build_client(secs);
        self
    }

    /// Build the `generateContent` body.
    ///
    /// System messages are joined into `systemInstruction`; assistant turns
    /// use Gemini's `model` role.
    fn build_body(request: &ProviderRequest) -> GenerateRequest<'_> {
        let mut system_parts: Vec<&str> = Vec::new();
        let mut contents: Vec<Content<'_>> = Vec::new();

        for msg in &request.messages {
            match msg.role {
                Role::System => system_parts.push(&msg.content),
                Role::User => contents.push(Content::text(Some("user"), &msg.content)),
                Role::Assistant => contents.push(Content::text(Some("model"), &msg.content)),
            }
        }

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(Content {
                role: None,
                parts: system_parts.into_iter().map(|text| Part { text }).collect(),
            })
        };

        GenerateRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                temperature: request.sampling.temperature,
                top_p: request.sampling.top_p,
                top_k: request.sampling.top_k,
                max_output_tokens: request.sampling.max_tokens,
            },
        }
    }

    /// Turn a decoded API response into our response type.
    fn parse_response(
        api: GenerateResponse,
        requested_model: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Some(reason) = api.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ProviderError::ApiError {
                status_code: 200,
                message: format!("Prompt blocked by provider: {reason}"),
            });
        }

        let candidate = api
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ApiError {
                status_code: 200,
                message: "No candidates in response".into(),
            })?;

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            return Err(ProviderError::ApiError {
                status_code: 200,
                message: format!(
                    "Empty response (finish reason: {})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            });
        }

        let usage = api.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage,
            model: api
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
        })
    }
}

#[async_trait]
impl skyline_core::Provider for GeminiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NotConfigured("Gemini API key is missing".into()));
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        let body = Self::build_body(&request);

        debug!(
            provider = %self.name,
            model = %request.model,
            messages = request.messages.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(&self.name, &request.model, response).await?;

        let api_response: GenerateResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        Self::parse_response(api_response, &request.model)
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(transport_error)?;

        Ok(response.status().is_success())
    }
}

// --- Gemini API types (internal) ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn text(role: Option<&'a str>, text: &'a str) -> Self {
        Self {
            role,
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    /// Thinking models mark reasoning parts; those are not shown to users.
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyline_core::Provider;

    fn sample_request() -> ProviderRequest {
        ProviderRequest::from_prompt(
            "gemini-2.5-flash",
            Some("You are a support agent."),
            "CURRENT QUESTION: What is the booking amount?",
            SamplingParams {
                temperature: 0.2,
                top_p: Some(0.95),
                top_k: Some(40),
                max_tokens: Some(500),
            },
        )
    }

    fn parse(json: &str) -> Result<ProviderResponse, ProviderError> {
        let api: GenerateResponse = serde_json::from_str(json).unwrap();
        GeminiProvider::parse_response(api, "gemini-2.5-flash")
    }

    #[test]
    fn default_constructor() {
        let provider = GeminiProvider::new("key");
        assert_eq!(provider.name(), "gemini");
        assert!(provider.base_url.contains("generativelanguage.googleapis.com"));
    }

    #[test]
    fn custom_base_url_trims_slash() {
        let provider = GeminiProvider::new("key").with_base_url("http://localhost:8080/v1beta/");
        assert_eq!(provider.base_url, "http://localhost:8080/v1beta");
    }

    #[test]
    fn body_carries_sampling_and_system_instruction() {
        let request = sample_request();
        let body = serde_json::to_value(GeminiProvider::build_body(&request)).unwrap();

        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are a support agent."
        );
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "CURRENT QUESTION: What is the booking amount?"
        );

        let config = &body["generationConfig"];
        assert_eq!(config["topK"], 40);
        assert_eq!(config["maxOutputTokens"], 500);
        assert!((config["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert!((config["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn body_without_system_or_optional_sampling() {
        let request = ProviderRequest {
            model: "gemini-2.5-flash".into(),
            messages: vec![Message::user("hi"), Message::assistant("hello")],
            sampling: SamplingParams::default(),
        };
        let body = serde_json::to_value(GeminiProvider::build_body(&request)).unwrap();
        assert!(body.get("systemInstruction").is_none());
        assert_eq!(body["contents"][1]["role"], "model");
        assert!(body["generationConfig"].get("topK").is_none());
        assert!(body["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn parses_text_and_usage() {
        let resp = parse(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Booking is "}, {"text": "5 Lakhs."}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 8, "totalTokenCount": 128},
                "modelVersion": "gemini-2.5-flash-001"
            }"#,
        )
        .unwrap();
        assert_eq!(resp.message.content, "Booking is 5 Lakhs.");
        assert_eq!(resp.message.role, Role::Assistant);
        assert_eq!(resp.model, "gemini-2.5-flash-001");
        let usage = resp.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 120);
        assert_eq!(usage.completion_tokens, 8);
        assert_eq!(usage.total_tokens, 128);
    }

    #[test]
    fn skips_thought_parts() {
        let resp = parse(
            r#"{"candidates": [{"content": {"parts": [
                {"text": "reasoning...", "thought": true},
                {"text": "Answer."}
            ]}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.message.content, "Answer.");
        assert_eq!(resp.model, "gemini-2.5-flash");
        assert!(resp.usage.is_none());
    }

    #[test]
    fn blocked_prompt_is_error() {
        let err = parse(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn no_candidates_is_error() {
        let err = parse(r#"{"candidates": []}"#).unwrap_err();
        assert!(err.to_string().contains("No candidates"));
    }

    #[test]
    fn empty_candidate_reports_finish_reason() {
        let err = parse(r#"{"candidates": [{"content": {"parts": []}, "finishReason": "MAX_TOKENS"}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let provider = GeminiProvider::new("");
        let err = provider.complete(sample_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
