//! Configuration loading, validation, and management for Skyline.
//!
//! Loads configuration from `~/.skyline/config.toml` (or an explicit path)
//! with environment variable overrides. Validates all settings at startup;
//! the resulting [`AppConfig`] is read-only for the rest of the process.

use serde::{Deserialize, Serialize};
use skyline_core::provider::SamplingParams;
use std::path::{Path, PathBuf};

/// Placeholder the knowledge base context is substituted into.
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// The root configuration structure.
///
/// Maps directly to `~/.skyline/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the generation provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider, model and sampling settings
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Knowledge base location and presentation
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Prompt template and history rendering
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Short-term conversation memory
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Interactive session wording and behaviour
    #[serde(default)]
    pub session: SessionConfig,

    /// Response policy (disclaimer for general questions)
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Logging output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("knowledge", &self.knowledge)
            .field("prompt", &self.prompt)
            .field("memory", &self.memory)
            .field("session", &self.session)
            .field("policy", &self.policy)
            .field("logging", &self.logging)
            .finish()
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Backend name: "gemini", "openai", "openrouter", "ollama", or any name
    /// with an explicit `api_url`
    #[serde(default = "default_provider")]
    pub name: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Override the backend's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_top_p() -> f32 {
    0.95
}
fn default_top_k() -> u32 {
    40
}
fn default_max_output_tokens() -> u32 {
    500
}
fn default_request_timeout() -> u64 {
    120
}

impl ProviderSettings {
    /// Sampling parameters for every request of the session.
    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            temperature: self.temperature,
            top_p: Some(self.top_p),
            top_k: Some(self.top_k),
            max_tokens: Some(self.max_output_tokens),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
            api_url: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Path to the knowledge base JSON file
    #[serde(default = "default_knowledge_path")]
    pub path: PathBuf,

    /// Title used in the formatted context header
    #[serde(default = "default_knowledge_title")]
    pub title: String,
}

fn default_knowledge_path() -> PathBuf {
    PathBuf::from("data/knowledge_base.json")
}
fn default_knowledge_title() -> String {
    "SKYLINE RESIDENCES".into()
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: default_knowledge_path(),
            title: default_knowledge_title(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Instruction template with `{context}`, `{history}` and `{input}` slots
    #[serde(default = "default_template")]
    pub template: String,

    /// Persona instructions sent as a system message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,

    /// Label for customer turns in the rendered history
    #[serde(default = "default_human_prefix")]
    pub human_prefix: String,

    /// Label for assistant turns in the rendered history
    #[serde(default = "default_ai_prefix")]
    pub ai_prefix: String,
}

fn default_template() -> String {
    concat!(
        "You are the Skyline Residences AI assistant.\n",
        "\n",
        "KNOWLEDGE BASE (Use this to answer questions):\n",
        "{context}\n",
        "\n",
        "CONVERSATION HISTORY:\n",
        "{history}\n",
        "\n",
        "CURRENT QUESTION: {input}\n",
        "\n",
        "Instructions:\n",
        "- Answer based on knowledge base for property-specific questions\n",
        "- For general real estate queries, you can use general knowledge but add disclaimer\n",
        "- Be concise and helpful\n",
        "- If unsure, admit it and offer human assistance\n",
        "\n",
        "YOUR RESPONSE:",
    )
    .into()
}

/// The persona instructions written by `skyline onboard`.
pub fn default_system_instruction() -> String {
    concat!(
        "You are a professional customer support AI agent for Skyline Residences, ",
        "a premium real estate company in Noida.\n",
        "\n",
        "YOUR ROLE:\n",
        "- Answer customer queries about properties, pricing, amenities accurately\n",
        "- Be polite, helpful, and professional\n",
        "- Provide precise information from the knowledge base\n",
        "- Admit when you don't know something rather than guessing\n",
        "- Keep responses concise (2-4 sentences typically)\n",
        "- Match the customer's language (Hindi/English)\n",
        "\n",
        "IMPORTANT GUIDELINES:\n",
        "1. For prices, sizes, RERA numbers, contact info - use ONLY knowledge base\n",
        "2. If specific info not available, say: \"I don't have that information. ",
        "Let me connect you with our sales team.\"\n",
        "3. Always cite project names (Skyline Heights/Villas) when discussing properties\n",
        "4. For general real estate questions, you can use general knowledge with a disclaimer\n",
        "\n",
        "PERSONALITY: Friendly, professional, helpful, honest",
    )
    .into()
}

fn default_human_prefix() -> String {
    "Customer".into()
}
fn default_ai_prefix() -> String {
    "AI Assistant".into()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            system_instruction: None,
            human_prefix: default_human_prefix(),
            ai_prefix: default_ai_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Maximum number of turns (single utterances) kept in history
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
}

fn default_max_messages() -> usize {
    10
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Inputs (trimmed, case-insensitive) that end the session
    #[serde(default = "default_exit_keywords")]
    pub exit_keywords: Vec<String>,

    #[serde(default = "default_greeting")]
    pub greeting: String,

    #[serde(default = "default_farewell")]
    pub farewell: String,

    /// Printed when the session is interrupted with Ctrl-C
    #[serde(default = "default_interrupt_farewell")]
    pub interrupt_farewell: String,

    /// Printed when the user submits a blank line
    #[serde(default = "default_empty_input")]
    pub empty_input: String,

    /// Printed after a provider failure
    #[serde(default = "default_fallback_response")]
    pub fallback_response: String,

    #[serde(default = "default_true")]
    pub show_typing_indicator: bool,

    /// Print the full error chain on provider failures
    #[serde(default)]
    pub verbose: bool,
}

fn default_exit_keywords() -> Vec<String> {
    ["quit", "exit", "bye", "goodbye", "close", "stop"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_greeting() -> String {
    concat!(
        "\n",
        "🏠 Welcome to Skyline Residences AI Assistant!\n",
        "\n",
        "I can help you with:\n",
        "✅ Property details (Skyline Heights & Skyline Villas)\n",
        "✅ Pricing, sizes, and configurations\n",
        "✅ Amenities and features\n",
        "✅ Site visit bookings\n",
        "✅ Payment plans and offers\n",
        "✅ RERA and legal information\n",
        "\n",
        "Type your question or 'quit' to exit.\n",
        "\n",
        "How may I assist you today?\n",
    )
    .into()
}
fn default_farewell() -> String {
    "👋 Thank you for contacting Skyline Residences! Have a great day!".into()
}
fn default_interrupt_farewell() -> String {
    "👋 Chat interrupted. Goodbye!".into()
}
fn default_empty_input() -> String {
    "⚠️ Please enter a question!".into()
}
fn default_fallback_response() -> String {
    "I apologize for the technical difficulty. Please contact our team at +91-9876543210.".into()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            exit_keywords: default_exit_keywords(),
            greeting: default_greeting(),
            farewell: default_farewell(),
            interrupt_farewell: default_interrupt_farewell(),
            empty_input: default_empty_input(),
            fallback_response: default_fallback_response(),
            show_typing_indicator: true,
            verbose: false,
        }
    }
}

/// How strictly replies are tied to the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Property questions only; never add a disclaimer
    Strict,
    /// Property questions from the knowledge base, general ones flagged
    #[default]
    Hybrid,
    /// Anything goes; never add a disclaimer
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub mode: ResponseMode,

    #[serde(default = "default_true")]
    pub allow_general_knowledge: bool,

    /// Keywords that mark a question as property-specific
    #[serde(default = "default_strict_keywords")]
    pub strict_keywords: Vec<String>,

    /// Appended to replies for general questions in hybrid mode
    #[serde(default = "default_disclaimer")]
    pub disclaimer: String,
}

fn default_strict_keywords() -> Vec<String> {
    [
        "price", "cost", "pricing", "amount", "rupees", "lakhs", "crores",
        "size", "area", "sqft", "square",
        "bhk", "bedroom", "configuration",
        "rera", "legal", "approval", "registration",
        "payment", "booking", "emi", "installment",
        "possession", "delivery", "handover", "date",
        "contact", "phone", "email", "address", "office",
        "project", "skyline", "heights", "villas",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
fn default_disclaimer() -> String {
    "\n\n💡 Note: This is general information. For specific property details, contact our team."
        .into()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            mode: ResponseMode::default(),
            allow_general_knowledge: true,
            strict_keywords: default_strict_keywords(),
            disclaimer: default_disclaimer(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Append logs to this file. Empty (or absent) means stderr.
    #[serde(default = "default_log_file", skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Record each customer question under `skyline::transcript`

    #[serde(default = "default_true")]
    pub log_user_queries: bool,

    /// Record each reply under `skyline::transcript`
    #[serde(default = "default_true")]
    pub log_bot_responses: bool,
}

fn default_log_level() -> String {
    "info".into()
}
fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("chatbot_logs.txt"))
}

impl LoggingConfig {
    /// The log file, if logging should go to one.
    pub fn log_file(&self) -> Option<&Path> {
        self.file
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
            log_user_queries: true,
            log_bot_responses: true,
        }
    }
}

impl AppConfig {
    /// Load from `path` (usually [`AppConfig::config_path`]), apply
    /// environment overrides, and validate.
    ///
    /// Environment variables override file settings:
    /// - `SKYLINE_API_KEY`, `GEMINI_API_KEY`, `GOOGLE_API_KEY` (first
    ///   non-empty one, only when no key is configured)
    /// - `SKYLINE_PROVIDER`, `SKYLINE_MODEL`, `SKYLINE_KNOWLEDGE_BASE`
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup. Blank values count as
    /// unset.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.api_key.is_none() {
            self.api_key = lookup("SKYLINE_API_KEY")
                .or_else(|| lookup("GEMINI_API_KEY"))
                .or_else(|| lookup("GOOGLE_API_KEY"));
        }

        if let Some(provider) = lookup("SKYLINE_PROVIDER") {
            self.provider.name = provider;
        }

        if let Some(model) = lookup("SKYLINE_MODEL") {
            self.provider.model = model;
        }

        if let Some(path) = lookup("SKYLINE_KNOWLEDGE_BASE") {
            self.knowledge.path = PathBuf::from(path);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".skyline")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.provider;
        if !(0.0..=2.0).contains(&p.temperature) {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if !(0.0..=1.0).contains(&p.top_p) {
            return Err(ConfigError::ValidationError(
                "provider.top_p must be between 0.0 and 1.0".into(),
            ));
        }

        if p.top_k == 0 {
            return Err(ConfigError::ValidationError("provider.top_k must be > 0".into()));
        }

        if p.max_output_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "provider.max_output_tokens must be > 0".into(),
            ));
        }

        if self.memory.max_messages == 0 {
            return Err(ConfigError::ValidationError(
                "memory.max_messages must be > 0".into(),
            ));
        }

        if self.session.exit_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "session.exit_keywords must contain at least one keyword".into(),
            ));
        }

        // A template without the context slot would silently drop the
        // knowledge base from every prompt.
        if !self.prompt.template.contains(CONTEXT_PLACEHOLDER) {
            return Err(ConfigError::ValidationError(format!(
                "prompt.template must contain the {CONTEXT_PLACEHOLDER} placeholder"
            )));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self {
            prompt: PromptConfig {
                system_instruction: Some(default_system_instruction()),
                ..PromptConfig::default()
            },
            ..Self::default()
        };
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: ProviderSettings::default(),
            knowledge: KnowledgeConfig::default(),
            prompt: PromptConfig::default(),
            memory: MemoryConfig::default(),
            session: SessionConfig::default(),
            policy: PolicyConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
