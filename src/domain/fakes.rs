use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Assistant;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequest;
use crate::domain::models::Diagnostic;
use crate::domain::models::DiagnosticSink;
use crate::domain::models::MessageId;
use crate::domain::models::RemoteMessage;
use crate::domain::models::SessionId;
use crate::domain::services::SessionController;

/// Scripted assistant. Replies are handed out in the order they were queued.
#[derive(Default)]
pub struct FakeAssistant {
    replies: Mutex<VecDeque<Result<ChatReply, String>>>,
    requests: Mutex<Vec<ChatRequest>>,
    deleted: Mutex<Vec<SessionId>>,
    history: Vec<RemoteMessage>,
    failing_deletes: bool,
    unhealthy: bool,
}

impl FakeAssistant {
    pub fn reply(self, session_id: &str, message_id: &str, response: &str) -> FakeAssistant {
        self.replies.lock().unwrap().push_back(Ok(ChatReply {
            session_id: SessionId::new(session_id),
            message_id: MessageId::new(message_id),
            response: response.to_string(),
        }));
        return self;
    }

    pub fn fail(self, error: &str) -> FakeAssistant {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(error.to_string()));
        return self;
    }

    pub fn failing_deletes(mut self) -> FakeAssistant {
        self.failing_deletes = true;
        return self;
    }

    pub fn unhealthy(mut self) -> FakeAssistant {
        self.unhealthy = true;
        return self;
    }

    pub fn with_history(mut self, history: Vec<RemoteMessage>) -> FakeAssistant {
        self.history = history;
        return self;
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        return self.requests.lock().unwrap().clone();
    }

    pub fn deleted(&self) -> Vec<SessionId> {
        return self.deleted.lock().unwrap().clone();
    }
}

#[async_trait]
impl Assistant for FakeAssistant {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.unhealthy {
            bail!("connection refused");
        }
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn send(&self, request: ChatRequest) -> Result<ChatReply> {
        self.requests.lock().unwrap().push(request);

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Ok(reply)) => return Ok(reply),
            Some(Err(err)) => bail!(err),
            None => bail!("no scripted reply left"),
        }
    }

    #[allow(clippy::implicit_return)]
    async fn delete_session(&self, session_id: &SessionId) -> Result<()> {
        self.deleted.lock().unwrap().push(session_id.clone());
        if self.failing_deletes {
            bail!("connection reset");
        }
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn history(&self, _session_id: &SessionId) -> Result<Vec<RemoteMessage>> {
        return Ok(self.history.clone());
    }
}

#[derive(Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn reports(&self) -> Vec<Diagnostic> {
        return self.reports.lock().unwrap().clone();
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.reports.lock().unwrap().push(diagnostic);
    }
}

pub fn controller(
    assistant: FakeAssistant,
) -> (SessionController, Arc<FakeAssistant>, Arc<RecordingSink>) {
    let assistant = Arc::new(assistant);
    let sink = Arc::new(RecordingSink::default());
    let controller = SessionController::new(assistant.clone(), sink.clone());

    return (controller, assistant, sink);
}
