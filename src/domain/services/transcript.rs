#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use serde_derive::Serialize;

use crate::domain::models::Message;
use crate::domain::models::SessionId;

/// Read view of the transcript handed to the presentation layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TranscriptSnapshot {
    pub messages: Vec<Message>,
    pub sending: bool,
    pub session_id: Option<SessionId>,
}

impl TranscriptSnapshot {
    /// Messages that make up the exchanged conversation. Failure
    /// placeholders never count as history.
    pub fn conversation(&self) -> impl Iterator<Item = &Message> {
        return self.messages.iter().filter(|message| return !message.is_error());
    }
}

/// Insertion ordered message store plus the flags derived from it. Holds no
/// validation logic, the session controller owns that.
#[derive(Default)]
pub struct Transcript {
    messages: Vec<Message>,
    sending: bool,
    session_id: Option<SessionId>,
}

impl Transcript {
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Drops every message and the session identity. The in-flight flag is
    /// left alone, it belongs to whichever send is still running.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.session_id = None;
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        return TranscriptSnapshot {
            messages: self.messages.clone(),
            sending: self.sending,
            session_id: self.session_id.clone(),
        };
    }

    pub fn set_sending(&mut self, sending: bool) {
        self.sending = sending;
    }

    pub fn is_sending(&self) -> bool {
        return self.sending;
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        return self.session_id.as_ref();
    }

    /// Sets the session identity if none is held yet. Returns whether the id
    /// was adopted.
    pub fn adopt_session(&mut self, session_id: SessionId) -> bool {
        if self.session_id.is_some() || session_id.is_empty() {
            return false;
        }

        self.session_id = Some(session_id);
        return true;
    }

    pub fn len(&self) -> usize {
        return self.messages.len();
    }
}
