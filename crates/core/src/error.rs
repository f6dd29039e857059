//! Error types for the Skyline domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; callers decide which ones
//! are fatal.

use std::path::PathBuf;
use thiserror::Error;

// --- Bounded context errors ---

/// Failures while loading the knowledge base. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Knowledge base file not found at {path}: {reason}")]
    NotFound { path: PathBuf, reason: String },

    #[error("Knowledge base at {path} is corrupted or not valid JSON: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Knowledge base at {path} is empty")]
    Empty { path: PathBuf },
}

/// Failures at the generation boundary. Never fatal to a session.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel connection lost: {0}")]
    ConnectionLost(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn knowledge_error_names_the_path() {
        let err = KnowledgeError::Empty {
            path: PathBuf::from("data/knowledge_base.json"),
        };
        assert!(err.to_string().contains("data/knowledge_base.json"));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn parse_error_carries_reason() {
        let err = KnowledgeError::Parse {
            path: PathBuf::from("kb.json"),
            reason: "expected value at line 1 column 1".into(),
        };
        assert!(err.to_string().contains("line 1 column 1"));
    }
}
