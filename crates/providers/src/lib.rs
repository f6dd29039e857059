//! LLM Provider implementations for Skyline.
//!
//! All providers implement the `skyline_core::Provider` trait.
//! [`build_from_config`] builds the configured provider from [`skyline_config::AppConfig`].

mod http;

pub mod gemini;
pub mod openai_compat;
pub mod router;

pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::{build_from_config, requires_api_key};
