#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::Rejection;
use super::SendOutcome;
use super::SessionController;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::RemoteMessage;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /clear (/c) - Clears the conversation and asks the assistant to forget the session.
- /history - Shows what the assistant has recorded for the current session.
- /session (/s) - Shows the current session identifier.
- /quit /exit (/q) - Exit Clompanion.
- /help (/h) - Provides this help menu.

Anything else you type is sent to the assistant. Only one message can be waiting on a reply at a time.
        "#;

    return text.trim().to_string();
}

fn format_history(messages: &[RemoteMessage]) -> String {
    if messages.is_empty() {
        return "The assistant has nothing recorded for this session.".to_string();
    }

    let lines = messages
        .iter()
        .map(|message| {
            return format!("- {}: {}", message.role, message.content);
        })
        .collect::<Vec<String>>();

    return format!(
        "The assistant has recorded {} messages for this session:\n{}",
        messages.len(),
        lines.join("\n")
    );
}

async fn history(controller: &SessionController, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    match controller.remote_history().await {
        Ok(Some(messages)) => {
            tx.send(Event::Notice(format_history(&messages)))?;
        }
        Ok(None) => {
            tx.send(Event::Notice(
                "There is no session yet. Say something first!".to_string(),
            ))?;
        }
        Err(err) => {
            tracing::error!(error = ?err, "Failed to fetch session history");
            tx.send(Event::Warning(format!(
                "Unable to fetch the session history: {err}"
            )))?;
        }
    }

    return Ok(());
}

fn settled(tx: &mpsc::UnboundedSender<Event>, outcome: SendOutcome) -> Result<()> {
    tracing::debug!(outcome = ?outcome, "Send settled");

    if outcome == SendOutcome::Rejected(Rejection::InFlight) {
        tx.send(Event::Notice(
            "Still waiting on the last reply, try again in a moment.".to_string(),
        ))?;
    }

    return Ok(());
}

pub struct ActionsService {}

impl ActionsService {
    /// Dispatches intents to the controller until the action channel closes.
    /// Submissions claim the in-flight slot in arrival order, only the wait
    /// for the reply runs in the background.
    pub async fn start(
        controller: SessionController,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        if let Err(err) = controller.health_check().await {
            tx.send(Event::Warning(format!(
                "Hey, it looks like the assistant service isn't reachable. Messages will fail until it is.\n\nError: {err}"
            )))?;
        }

        let mut workers: JoinSet<SendOutcome> = JoinSet::new();

        loop {
            tokio::select! {
                action = rx.recv() => {
                    let action = match action {
                        Some(action) => action,
                        None => break,
                    };

                    match action {
                        Action::Submit(text) => {
                            workers.spawn(controller.send_message(&text));
                        }
                        Action::Clear() => {
                            controller.clear_chat().await;
                        }
                        Action::History() => {
                            history(&controller, &tx).await?;
                        }
                    }
                }
                Some(res) = workers.join_next(), if !workers.is_empty() => {
                    settled(&tx, res?)?;
                }
            }
        }

        while let Some(res) = workers.join_next().await {
            settled(&tx, res?)?;
        }

        return Ok(());
    }
}
