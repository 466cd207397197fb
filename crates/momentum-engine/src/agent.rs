//! Agent conversation interface.
//!
//! No LLM backend ships yet. This module fixes the shape a backend must
//! have so the TUI can stream its replies into the conversation pane.

use std::fmt;

use tokio::sync::mpsc;
use uuid::Uuid;

/// Identifies one writing session when talking to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a fresh random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One item of an agent's streamed reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// A chunk of response text.
    Token(String),
    /// The reply is complete.
    Done,
    /// The request failed; the message is shown to the user.
    Failed(String),
}

/// A conversation backend that streams replies token by token.
pub trait AgentBackend: Send + Sync {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Send the current entry content and receive the streamed reply.
    ///
    /// The returned channel closes after `Done` or `Failed`.
    fn send_context(&self, session: SessionId, content: String) -> mpsc::UnboundedReceiver<AgentEvent>;
}
