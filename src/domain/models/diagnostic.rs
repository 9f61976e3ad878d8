use std::sync::Arc;

use super::SessionId;

/// Failures the controller recovers from on its own. They never reach the
/// transcript verbatim, only a sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    SendFailed {
        error: String,
    },
    ClearNotifyFailed {
        session_id: SessionId,
        error: String,
    },
    StaleReplyDiscarded {
        started_generation: u64,
        current_generation: u64,
    },
}

pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

pub type DiagnosticBox = Arc<dyn DiagnosticSink + Send + Sync>;
