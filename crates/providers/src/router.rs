//! Provider selection — builds the configured LLM provider.

use std::sync::Arc;
use skyline_config::AppConfig;
use skyline_core::error::ProviderError;
use skyline_core::provider::Provider;
use crate::gemini::GeminiProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// Whether the named backend refuses requests without a key.
pub fn requires_api_key(name: &str) -> bool {
    name != "ollama"
}

/// Build the configured provider.
///
/// Known names get their public endpoint; anything else must come with
/// `provider.api_url` and is treated as OpenAI-compatible.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let settings = &config.provider;
    let api_key = config.api_key.clone().unwrap_or_default();
    let timeout = settings.request_timeout_secs;
    let api_url = settings.api_url.as_deref();

    let provider: Arc<dyn Provider> = match settings.name.as_str() {
        "gemini" => {
            let mut p = GeminiProvider::new(api_key).with_timeout(timeout);
            if let Some(url) = api_url {
                p = p.with_base_url(url);
            }
            Arc::new(p)
        }
        "ollama" => Arc::new(OpenAiCompatProvider::ollama(api_url).with_timeout(timeout)),
        name => {
            let base_url = api_url
                .map(str::to_string)
                .or_else(|| default_base_url(name).map(str::to_string))
                .ok_or_else(|| {
                    ProviderError::NotConfigured(format!(
                        "provider '{name}' needs provider.api_url"
                    ))
                })?;
            Arc::new(OpenAiCompatProvider::new(name, base_url, api_key).with_timeout(timeout))
        }
    };

    Ok(provider)
}

fn default_base_url(name: &str) -> Option<&'static str> {
    match name {
        "openai" => Some("https://api.openai.com/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "together" => Some("https://api.together.xyz/v1"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_gemini_by_default() {
        let provider = build_from_config(&AppConfig::default()).unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn builds_known_openai_compatible() {
        let mut config = AppConfig::default();
        config.provider.name = "openrouter".into();
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "openrouter");

        config.provider.name = "ollama".into();
        assert_eq!(build_from_config(&config).unwrap().name(), "ollama");
    }

    #[test]
    fn unknown_provider_needs_url() {
        let mut config = AppConfig::default();
        config.provider.name = "acme".into();
        assert!(matches!(
            build_from_config(&config),
            Err(ProviderError::NotConfigured(_))
        ));

        config.provider.api_url = Some("http://llm.internal/v1".into());
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "acme");
    }

    #[test]
    fn ollama_needs_no_key() {
        assert!(!requires_api_key("ollama"));
        assert!(requires_api_key("gemini"));
    }
}
