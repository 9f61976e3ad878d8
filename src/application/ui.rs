#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

use anyhow::Result;
use owo_colors::OwoColorize;
use owo_colors::Stream;
use tokio::io;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio::sync::watch;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::SlashCommand;
use crate::domain::services::actions::help_text;
use crate::domain::services::LineStyle;
use crate::domain::services::TranscriptSnapshot;
use crate::domain::services::TranscriptView;
use crate::domain::services::ViewLine;

fn info_lines(text: &str) -> Vec<ViewLine> {
    return text
        .split('\n')
        .map(|line| return ViewLine::new(LineStyle::Info, line))
        .collect();
}

fn session_status(snapshot: &TranscriptSnapshot) -> String {
    match &snapshot.session_id {
        Some(session_id) => {
            let exchanged = snapshot.conversation().count();
            return format!("Session {session_id}, {exchanged} messages exchanged.");
        }
        None => {
            return "No session yet, send a message to start one.".to_string();
        }
    }
}

/// Turns one line of user input into an intent. Returns whether the user
/// asked to quit, and any lines to print locally.
pub fn handle_input(
    text: &str,
    tx: &mpsc::UnboundedSender<Action>,
    snapshot: &TranscriptSnapshot,
) -> Result<(bool, Vec<ViewLine>)> {
    if let Some(command) = SlashCommand::parse(text) {
        if command.is_quit() {
            return Ok((true, vec![]));
        }
        if command.is_help() {
            return Ok((false, info_lines(&help_text())));
        }
        if command.is_session() {
            return Ok((false, info_lines(&session_status(snapshot))));
        }
        if command.is_clear() {
            tx.send(Action::Clear())?;
            return Ok((false, vec![]));
        }
        if command.is_history() {
            tx.send(Action::History())?;
            return Ok((false, vec![]));
        }
    }

    if !text.trim().is_empty() {
        tx.send(Action::Submit(text.to_string()))?;
    }

    return Ok((false, vec![]));
}

fn print_lines(lines: &[ViewLine]) {
    for line in lines {
        let text = &line.text;
        match line.style {
            LineStyle::User => {
                println!("{}", text.if_supports_color(Stream::Stdout, |t| t.cyan()));
            }
            LineStyle::Assistant => {
                println!("{}", text.if_supports_color(Stream::Stdout, |t| t.green()));
            }
            LineStyle::Error => {
                println!("{}", text.if_supports_color(Stream::Stdout, |t| t.red()));
            }
            LineStyle::Pending => {
                println!("{}", text.if_supports_color(Stream::Stdout, |t| t.dimmed()));
            }
            LineStyle::Info => {
                println!("{}", text.if_supports_color(Stream::Stdout, |t| t.bold()));
            }
            LineStyle::Warning => {
                println!("{}", text.if_supports_color(Stream::Stdout, |t| t.yellow()));
            }
        }
    }
}

fn event_lines(event: Event) -> Vec<ViewLine> {
    match event {
        Event::Notice(text) => return info_lines(&text),
        Event::Warning(text) => {
            return text
                .split('\n')
                .map(|line| return ViewLine::new(LineStyle::Warning, line))
                .collect();
        }
    }
}

/// Line oriented front end. Reads stdin, dispatches intents and prints the
/// transcript as snapshots arrive.
pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    mut rx: mpsc::UnboundedReceiver<Event>,
    mut updates: watch::Receiver<TranscriptSnapshot>,
) -> Result<()> {
    let mut view = TranscriptView::default();
    let mut input = io::BufReader::new(io::stdin()).lines();

    print_lines(&TranscriptView::welcome());

    #[cfg(feature = "dev")]
    {
        tx.send(Action::Submit(
            "Hello! What can you help me with?".to_string(),
        ))?;
    }

    loop {
        tokio::select! {
            line = input.next_line() => {
                let text = match line? {
                    Some(text) => text,
                    None => return Ok(()),
                };

                let snapshot = updates.borrow().clone();
                let (should_quit, lines) = handle_input(&text, &tx, &snapshot)?;
                print_lines(&lines);
                if should_quit {
                    return Ok(());
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = updates.borrow_and_update().clone();
                print_lines(&view.render(&snapshot));
            }
            Some(event) = rx.recv() => {
                print_lines(&event_lines(event));
            }
        }
    }
}
