//! The personal assistant seam.
//!
//! A [`Responder`] turns a message into a reply asynchronously. The built-in
//! [`CannedResponder`] stands in for a real backend; [`Assistant`] keeps the
//! conversation log and the request state around whichever responder it is
//! given.

mod canned;

pub use canned::CannedResponder;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SECTION: &str = "general";
pub const GREETING: &str = "Hello! I'm your assistant. How can I help you today?";
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process that request. Please try again.";

#[async_trait]
pub trait Responder: Send + Sync {
    /// Reply to `message` sent from the application section `section`.
    async fn respond(&self, section: &str, message: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantRequest {
    #[serde(default = "default_section")]
    pub section: String,
    pub message: String,
}

fn default_section() -> String {
    DEFAULT_SECTION.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantReply {
    pub reply: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantState {
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

/// One conversation: `Idle -> AwaitingResponse -> Idle` per message.
///
/// `send` takes `&mut self`, so a conversation has at most one request in
/// flight. Dropping a `send` future mid-flight leaves the state at
/// `AwaitingResponse` until the next `send` starts.
pub struct Assistant {
    responder: Arc<dyn Responder>,
    section: String,
    messages: Vec<ChatMessage>,
    state: AssistantState,
}

impl Assistant {
    pub fn new(responder: Arc<dyn Responder>, section: impl Into<String>) -> Self {
        Self {
            responder,
            section: section.into(),
            messages: vec![ChatMessage::new(Role::Assistant, GREETING)],
            state: AssistantState::Idle,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> AssistantState {
        self.state
    }

    pub fn set_section(&mut self, section: impl Into<String>) {
        self.section = section.into();
    }

    /// Send a message and wait for the reply. Blank input is ignored and
    /// returns `None`; otherwise returns the appended reply, which is
    /// [`FALLBACK_REPLY`] if the responder failed.
    pub async fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if self.state == AssistantState::AwaitingResponse {
            tracing::debug!("previous assistant request was abandoned");
        }
        self.messages.push(ChatMessage::new(Role::User, text));
        self.state = AssistantState::AwaitingResponse;

        let reply = match self.responder.respond(&self.section, text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(section = %self.section, "assistant responder failed: {e:#}");
                FALLBACK_REPLY.to_string()
            }
        };

        self.messages.push(ChatMessage::new(Role::Assistant, reply));
        self.state = AssistantState::Idle;
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Responder for Echo {
        async fn respond(&self, section: &str, message: &str) -> anyhow::Result<String> {
            Ok(format!("[{section}] {message}"))
        }
    }

    struct Broken;

    #[async_trait]
    impl Responder for Broken {
        async fn respond(&self, _section: &str, _message: &str) -> anyhow::Result<String> {
            anyhow::bail!("backend unavailable")
        }
    }

    #[tokio::test]
    async fn starts_idle_with_a_greeting() {
        let assistant = Assistant::new(Arc::new(Echo), "tasks");
        assert_eq!(assistant.state(), AssistantState::Idle);
        assert_eq!(assistant.messages().len(), 1);
        assert_eq!(assistant.messages()[0].role, Role::Assistant);
    }

    #[tokio::test]
    async fn appends_user_message_and_reply() {
        let mut assistant = Assistant::new(Arc::new(Echo), "tasks");
        let reply = assistant.send("  what is due?  ").await.unwrap().clone();
        assert_eq!(reply.text, "[tasks] what is due?");
        assert_eq!(assistant.state(), AssistantState::Idle);

        let roles: Vec<_> = assistant.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut assistant = Assistant::new(Arc::new(Echo), "tasks");
        assert!(assistant.send("   ").await.is_none());
        assert_eq!(assistant.messages().len(), 1);
    }

    #[tokio::test]
    async fn responder_failure_becomes_fallback_reply() {
        let mut assistant = Assistant::new(Arc::new(Broken), "cases");
        let reply = assistant.send("hello").await.unwrap();
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert_eq!(assistant.state(), AssistantState::Idle);
    }
}
