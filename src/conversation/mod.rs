//! Conversation log and request-cycle orchestration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::translate::Role;

pub mod controller;

pub use controller::{ConversationController, CycleOutcome};

/// One entry in the conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Unique message id
    pub id: Uuid,
    /// `User` or `Assistant`
    pub role: Role,
    /// Message text
    pub content: String,
    /// When the message was appended
    pub at: DateTime<Utc>,
}

/// Append-only, ordered message log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationLog {
    messages: Vec<ConversationMessage>,
}

impl ConversationLog {
    /// A log holding the assistant's opening message
    pub fn seeded(greeting: impl Into<String>) -> Self {
        let mut log = Self::default();
        log.append_assistant(greeting);
        log
    }

    /// Append a user message
    pub fn append_user(&mut self, content: impl Into<String>) -> &ConversationMessage {
        self.append(Role::User, content.into())
    }

    /// Append an assistant message
    pub fn append_assistant(&mut self, content: impl Into<String>) -> &ConversationMessage {
        self.append(Role::Assistant, content.into())
    }

    fn append(&mut self, role: Role, content: String) -> &ConversationMessage {
        self.messages.push(ConversationMessage {
            id: Uuid::new_v4(),
            role,
            content,
            at: Utc::now(),
        });
        &self.messages[self.messages.len() - 1]
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// Most recent message
    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if the log is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_log_starts_with_assistant() {
        let mut log = ConversationLog::seeded("hello");
        log.append_user("timber in Leeds");
        log.append_assistant("Showing all data.");

        let roles: Vec<_> = log.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(log.messages()[0].content, "hello");
        assert_ne!(log.messages()[0].id, log.messages()[1].id);
    }
}
