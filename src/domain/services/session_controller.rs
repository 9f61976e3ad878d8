#[cfg(test)]
#[path = "session_controller_test.rs"]
mod tests;

use std::future::Future;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use anyhow::Result;
use tokio::sync::watch;

use super::Transcript;
use super::TranscriptSnapshot;
use crate::domain::models::AssistantBox;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequest;
use crate::domain::models::Diagnostic;
use crate::domain::models::DiagnosticBox;
use crate::domain::models::Message;
use crate::domain::models::RemoteMessage;
use crate::domain::models::SessionId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing left after trimming.
    Empty,
    /// Another send is still waiting on the assistant.
    InFlight,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Rejected(Rejection),
    Replied,
    Failed,
    /// The conversation was cleared while the reply was on its way.
    Discarded,
}

#[derive(Default)]
struct State {
    transcript: Transcript,
    /// Bumped on every clear. Replies to sends started in an older
    /// generation are dropped.
    generation: u64,
}

/// Owns the transcript and session identity for one conversation. Cloning
/// hands out another handle to the same conversation.
#[derive(Clone)]
pub struct SessionController {
    assistant: AssistantBox,
    diagnostics: DiagnosticBox,
    state: Arc<Mutex<State>>,
    updates: Arc<watch::Sender<TranscriptSnapshot>>,
}

impl SessionController {
    pub fn new(assistant: AssistantBox, diagnostics: DiagnosticBox) -> SessionController {
        let (updates, _) = watch::channel(TranscriptSnapshot::default());

        return SessionController {
            assistant,
            diagnostics,
            state: Arc::new(Mutex::new(State::default())),
            updates: Arc::new(updates),
        };
    }

    /// Receives a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<TranscriptSnapshot> {
        return self.updates.subscribe();
    }

    /// Starts a send right away and returns the wait for its outcome. Calls
    /// claim the in-flight slot in call order, whenever their futures are
    /// polled.
    pub fn send_message(
        &self,
        raw_text: &str,
    ) -> impl Future<Output = SendOutcome> + Send + 'static {
        let started = self.begin_send(raw_text);

        return async move {
            match started {
                Ok(pending) => return pending.complete().await,
                Err(rejection) => return SendOutcome::Rejected(rejection),
            }
        };
    }

    /// Validates the input, claims the in-flight slot and appends the user's
    /// message right away. The returned [`PendingSend`] performs the remote
    /// call; dropping it without completing releases the slot.
    pub fn begin_send(&self, raw_text: &str) -> Result<PendingSend, Rejection> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(Rejection::Empty);
        }

        let mut state = self.lock();
        if state.transcript.is_sending() {
            tracing::debug!("Send already in flight, ignoring submit");
            return Err(Rejection::InFlight);
        }

        state.transcript.set_sending(true);
        state.transcript.append(Message::user(text));

        let request = ChatRequest {
            message: text.to_string(),
            session_id: state.transcript.session_id().cloned(),
        };
        let generation = state.generation;
        tracing::debug!(
            messages = state.transcript.len(),
            generation = generation,
            "Send started"
        );
        self.publish(&state);
        drop(state);

        return Ok(PendingSend {
            guard: SendingGuard {
                controller: self.clone(),
            },
            request,
            generation,
        });
    }

    /// Forgets the conversation. The assistant is asked to drop its copy of
    /// the session first, but the local clear happens whatever it answers.
    pub async fn clear_chat(&self) {
        let session_id = self.lock().transcript.session_id().cloned();

        if let Some(session_id) = session_id {
            self.forget_remote_session(session_id).await;
        }

        let mut state = self.lock();
        state.transcript.clear();
        state.generation += 1;
        self.publish(&state);
    }

    pub async fn health_check(&self) -> Result<()> {
        return self.assistant.health_check().await;
    }

    /// What the assistant has recorded for the current session, or `None`
    /// when no session has been established yet.
    pub async fn remote_history(&self) -> Result<Option<Vec<RemoteMessage>>> {
        let session_id = self.lock().transcript.session_id().cloned();

        match session_id {
            Some(session_id) => {
                let messages = self.assistant.history(&session_id).await?;
                return Ok(Some(messages));
            }
            None => return Ok(None),
        }
    }

    /// Best-effort delete. Failures only reach the diagnostic sink.
    async fn forget_remote_session(&self, session_id: SessionId) {
        let res = self.assistant.delete_session(&session_id).await;
        if let Err(err) = res {
            self.diagnostics.report(Diagnostic::ClearNotifyFailed {
                session_id,
                error: format!("{err:#}"),
            });
        }
    }

    /// Folds a reply into the transcript. Also returns the session a discarded
    /// reply opened on the service, when it still needs deleting.
    fn apply_reply(
        &self,
        generation: u64,
        res: Result<ChatReply>,
    ) -> (SendOutcome, Option<SessionId>) {
        let mut state = self.lock();

        let mut orphan = None;
        let (outcome, diagnostic) = if state.generation != generation {
            if let Ok(reply) = res {
                let adopted = state.transcript.session_id() == Some(&reply.session_id);
                if !adopted && !reply.session_id.is_empty() {
                    orphan = Some(reply.session_id);
                }
            }

            let diagnostic = Diagnostic::StaleReplyDiscarded {
                started_generation: generation,
                current_generation: state.generation,
            };
            (SendOutcome::Discarded, Some(diagnostic))
        } else {
            match res {
                Ok(reply) => {
                    let session_id = reply.session_id.clone();
                    if state.transcript.adopt_session(reply.session_id) {
                        tracing::debug!(session_id = session_id.as_str(), "Session established");
                    }
                    state
                        .transcript
                        .append(Message::assistant(reply.message_id, &reply.response));
                    (SendOutcome::Replied, None)
                }
                Err(err) => {
                    state.transcript.append(Message::failed());
                    let diagnostic = Diagnostic::SendFailed {
                        error: format!("{err:#}"),
                    };
                    (SendOutcome::Failed, Some(diagnostic))
                }
            }
        };
        drop(state);

        if let Some(diagnostic) = diagnostic {
            self.diagnostics.report(diagnostic);
        }

        return (outcome, orphan);
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        return self.state.lock().unwrap_or_else(PoisonError::into_inner);
    }

    fn publish(&self, state: &State) {
        self.updates.send_replace(state.transcript.snapshot());
    }
}

/// Releases the in-flight slot when dropped, whether the send completed or
/// its future was abandoned.
struct SendingGuard {
    controller: SessionController,
}

impl Drop for SendingGuard {
    fn drop(&mut self) {
        let mut state = self.controller.lock();
        state.transcript.set_sending(false);
        self.controller.publish(&state);
    }
}

/// A send whose user message is already in the transcript and which holds
/// the in-flight slot until it is completed or dropped.
pub struct PendingSend {
    guard: SendingGuard,
    request: ChatRequest,
    generation: u64,
}

impl PendingSend {
    pub async fn complete(self) -> SendOutcome {
        let PendingSend {
            guard,
            request,
            generation,
        } = self;

        let controller = guard.controller.clone();
        let res = controller.assistant.send(request).await;
        let (outcome, orphan) = controller.apply_reply(generation, res);
        drop(guard);

        if let Some(session_id) = orphan {
            controller.forget_remote_session(session_id).await;
        }

        return outcome;
    }
}
