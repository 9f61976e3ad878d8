use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::MessageId;
use super::Role;
use super::SessionId;

/// Body of a chat request. `session_id` is left out entirely until the
/// service has handed one out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub session_id: SessionId,
    pub message_id: MessageId,
    pub response: String,
}

/// A message as the service stores it server side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    /// Seconds since the unix epoch.
    pub timestamp: f64,
}

#[async_trait]
pub trait Assistant {
    /// Used at startup to verify the service is reachable. A failure here is
    /// only ever surfaced as a warning.
    async fn health_check(&self) -> Result<()>;

    /// Sends one user message and waits for the full reply. Transport
    /// errors, non success statuses and undecodable bodies are all errors.
    async fn send(&self, request: ChatRequest) -> Result<ChatReply>;

    /// Asks the service to drop everything it holds for a session. The
    /// response status is not inspected.
    async fn delete_session(&self, session_id: &SessionId) -> Result<()>;

    /// Messages the service has recorded for a session.
    async fn history(&self, session_id: &SessionId) -> Result<Vec<RemoteMessage>>;
}

pub type AssistantBox = Arc<dyn Assistant + Send + Sync>;
