//! # Skyline Core
//!
//! Domain types, traits, and error definitions for the Skyline support agent.
//! This crate has **no framework dependencies**: it defines the model the
//! other crates implement against.
//!
//! The two seams are traits:
//! - [`Provider`] — the hosted text-generation backend
//! - [`Channel`] — where user input comes from and replies go to
//!
//! Everything else (knowledge base, memory, prompt assembly, the session
//! loop) is plain data and functions built on top of these.

pub mod channel;
pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use channel::{Channel, ChannelId, ChannelMessage};
pub use error::{ChannelError, KnowledgeError, ProviderError};
pub use message::{Message, Role, SessionId, Speaker, Turn};
pub use provider::{Provider, ProviderRequest, ProviderResponse, SamplingParams, Usage};
