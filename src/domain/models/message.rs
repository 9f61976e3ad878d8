#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

use super::Role;

/// The only text a user ever sees when a send fails.
pub const SEND_FAILED_TEXT: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: &str) -> MessageId {
        return MessageId(id.to_string());
    }

    /// Temporary identifier for entries created on this side of the wire.
    pub fn local() -> MessageId {
        return MessageId::new(&Uuid::new_v4().to_string());
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    Normal,
    Error,
}

/// A single transcript entry. Entries are never mutated once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    mtype: MessageType,
}

impl Message {
    pub fn user(content: &str) -> Message {
        return Message {
            id: MessageId::local(),
            role: Role::User,
            content: content.to_string(),
            timestamp: Utc::now(),
            mtype: MessageType::Normal,
        };
    }

    pub fn assistant(id: MessageId, content: &str) -> Message {
        return Message {
            id,
            role: Role::Assistant,
            content: content.to_string(),
            timestamp: Utc::now(),
            mtype: MessageType::Normal,
        };
    }

    /// Placeholder appended in place of an assistant reply when a send fails.
    pub fn failed() -> Message {
        return Message {
            id: MessageId::local(),
            role: Role::Assistant,
            content: SEND_FAILED_TEXT.to_string(),
            timestamp: Utc::now(),
            mtype: MessageType::Error,
        };
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }

    pub fn is_error(&self) -> bool {
        return self.message_type() == MessageType::Error;
    }
}
