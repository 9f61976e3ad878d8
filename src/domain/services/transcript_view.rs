#[cfg(test)]
#[path = "transcript_view_test.rs"]
mod tests;

use chrono::FixedOffset;
use chrono::Local;

use super::TranscriptSnapshot;
use crate::domain::models::Message;
use crate::domain::models::MessageId;
use crate::domain::models::Role;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineStyle {
    User,
    Assistant,
    Error,
    Pending,
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewLine {
    pub style: LineStyle,
    pub text: String,
}

impl ViewLine {
    pub fn new(style: LineStyle, text: &str) -> ViewLine {
        return ViewLine {
            style,
            text: text.to_string(),
        };
    }
}

/// Turns successive transcript snapshots into the lines a terminal still has
/// to print. Remembers what it already rendered so each message is printed
/// exactly once.
pub struct TranscriptView {
    rendered: usize,
    last_rendered: Option<MessageId>,
    sending: bool,
    offset: FixedOffset,
}

impl Default for TranscriptView {
    fn default() -> TranscriptView {
        return TranscriptView {
            rendered: 0,
            last_rendered: None,
            sending: false,
            offset: *Local::now().offset(),
        };
    }
}

impl TranscriptView {
    pub fn welcome() -> Vec<ViewLine> {
        return vec![
            ViewLine::new(LineStyle::Info, "Welcome to Clompanion!"),
            ViewLine::new(
                LineStyle::Info,
                "Start a conversation by typing a message below. Type /help for commands.",
            ),
        ];
    }

    pub fn render(&mut self, snapshot: &TranscriptSnapshot) -> Vec<ViewLine> {
        let mut lines = vec![];

        if self.was_cleared(snapshot) {
            lines.push(ViewLine::new(LineStyle::Info, "Chat cleared."));
            self.rendered = 0;
        }

        for message in &snapshot.messages[self.rendered..] {
            lines.append(&mut self.format_message(message));
        }
        self.rendered = snapshot.messages.len();
        self.last_rendered = snapshot.messages.last().map(|message| return message.id.clone());

        if snapshot.sending && !self.sending {
            lines.push(ViewLine::new(
                LineStyle::Pending,
                &format!("{} is typing...", Role::Assistant.label()),
            ));
        }
        self.sending = snapshot.sending;

        return lines;
    }

    fn was_cleared(&self, snapshot: &TranscriptSnapshot) -> bool {
        if self.rendered == 0 {
            return false;
        }
        if snapshot.messages.len() < self.rendered {
            return true;
        }

        // Cleared and refilled to at least the same length in between renders.
        let message = &snapshot.messages[self.rendered - 1];
        return self.last_rendered.as_ref() != Some(&message.id);
    }

    fn format_message(&self, message: &Message) -> Vec<ViewLine> {
        let style = if message.is_error() {
            LineStyle::Error
        } else if message.role == Role::User {
            LineStyle::User
        } else {
            LineStyle::Assistant
        };

        let time = message
            .timestamp
            .with_timezone(&self.offset)
            .format("%H:%M:%S");

        return message
            .content
            .split('\n')
            .enumerate()
            .map(|(idx, line)| {
                if idx == 0 {
                    return ViewLine::new(
                        style,
                        &format!("[{time}] {}: {line}", message.role.label()),
                    );
                }
                return ViewLine::new(style, &format!("    {line}"));
            })
            .collect();
    }
}
