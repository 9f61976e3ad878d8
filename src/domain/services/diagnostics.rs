use crate::domain::models::Diagnostic;
use crate::domain::models::DiagnosticSink;

/// Sink that forwards every diagnostic to the tracing subscriber.
#[derive(Default)]
pub struct TracingSink {}

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::SendFailed { error } => {
                tracing::error!(error = error, "Failed to send message to assistant");
            }
            Diagnostic::ClearNotifyFailed { session_id, error } => {
                tracing::warn!(
                    session_id = session_id.as_str(),
                    error = error,
                    "Failed to delete remote session"
                );
            }
            Diagnostic::StaleReplyDiscarded {
                started_generation,
                current_generation,
            } => {
                tracing::debug!(
                    started_generation = started_generation,
                    current_generation = current_generation,
                    "Discarded reply for a cleared conversation"
                );
            }
        }
    }
}
