//! Channel trait — the abstraction over the interactive text channel.
//!
//! A Channel delivers user lines to the session loop as a stream of
//! [`ChannelMessage`]s. The terminal is the only channel today; replies are
//! written by the session loop to its output sink.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use crate::error::ChannelError;

/// Unique identifier for a channel instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of user input received from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// The channel this message belongs to
    pub channel_id: ChannelId,

    /// Sender identifier
    pub sender_id: String,

    /// The raw text, untrimmed
    pub content: String,
}

impl ChannelMessage {
    pub fn new(channel_id: ChannelId, sender_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            channel_id,
            sender_id: sender_id.into(),
            content: content.into(),
        }
    }
}

/// The Channel trait.
#[async_trait]
pub trait Channel: Send + Sync {
    /// A human-readable name (e.g., "cli").
    fn name(&self) -> &str;

    fn id(&self) -> &ChannelId;

    /// Start receiving. The receiver closes when the input ends.
    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<ChannelMessage, ChannelError>>, ChannelError>;
}
