//! Provider trait — the abstraction over hosted LLM backends.
//!
//! A Provider takes one fully assembled request and returns one text
//! response. The session loop never knows which backend it is talking to.
//!
//! Implementations: Gemini (native), OpenAI-compatible endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ProviderError;
use crate::message::Message;

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Temperature (0.0 = deterministic, higher = more varied)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling cutoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Top-k sampling cutoff (not every backend supports it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: None,
            top_k: None,
            max_tokens: None,
        }
    }
}

/// One request to a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gemini-2.5-flash")
    pub model: String,

    /// System instructions first (optional), then the assembled prompt
    pub messages: Vec<Message>,

    /// Sampling parameters
    #[serde(default)]
    pub sampling: SamplingParams,
}

impl ProviderRequest {
    /// Build a request from a single assembled prompt and an optional system
    /// instruction.
    pub fn from_prompt(
        model: impl Into<String>,
        system_instruction: Option<&str>,
        prompt: impl Into<String>,
        sampling: SamplingParams,
    ) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_instruction.filter(|s| !s.trim().is_empty()) {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(prompt));
        Self {
            model: model.into(),
            messages,
            sampling,
        }
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated message
    pub message: Message,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// Every backend implements this. The session loop calls `complete()` once
/// per turn and treats any error as a non-fatal turn failure.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(&self, request: ProviderRequest) -> std::result::Result<ProviderResponse, ProviderError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn sampling_defaults() {
        let params = SamplingParams::default();
        assert!((params.temperature - 0.7).abs() < f32::EPSILON);
        assert!(params.top_k.is_none());
    }

    #[test]
    fn request_from_prompt_puts_system_first() {
        let req = ProviderRequest::from_prompt(
            "gemini-2.5-flash",
            Some("You are a support agent."),
            "CURRENT QUESTION: hi",
            SamplingParams::default(),
        );
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, Role::System);
        assert_eq!(req.messages[1].role, Role::User);
        assert_eq!(req.messages[1].content, "CURRENT QUESTION: hi");
    }

    #[test]
    fn blank_system_instruction_is_skipped() {
        let req = ProviderRequest::from_prompt("m", Some("  "), "p", SamplingParams::default());
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, Role::User);
    }
}
