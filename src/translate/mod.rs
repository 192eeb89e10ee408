//! Natural-language to filter translation
//!
//! The prompt builder frames an utterance for a chat-completions backend;
//! backends implement `TranslationBackend` and return the reply text as-is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TranslationResult;

pub mod client;
pub mod preset;
pub mod prompt;

pub use client::ChatCompletionsClient;
pub use preset::{AuthScheme, BackendConfig, BackendPreset};
pub use prompt::PromptBuilder;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the exchange
    System,
    /// The end user
    User,
    /// The assistant
    Assistant,
}

/// A role-tagged message as sent to a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System instructions
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// User text
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Assistant text
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A text-generation backend: send messages, get text back.
///
/// Implementations ask for a JSON-formatted reply, do not retry, and return
/// the reply text unmodified.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &str;

    /// Send the messages and return the reply text
    async fn send(&self, messages: &[ChatMessage]) -> TranslationResult<String>;
}
