use super::Message;
use super::MessageId;
use super::MessageType;
use super::SEND_FAILED_TEXT;
use crate::domain::models::Role;

#[test]
fn it_executes_user() {
    let msg = Message::user("Hi there!");
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.content, "Hi there!".to_string());
    assert_eq!(msg.mtype, MessageType::Normal);
    assert!(!msg.is_error());
    assert!(!msg.id.as_str().is_empty());
}

#[test]
fn it_assigns_unique_local_ids() {
    let first = Message::user("one");
    let second = Message::user("two");
    assert_ne!(first.id, second.id);
}

#[test]
fn it_executes_assistant() {
    let msg = Message::assistant(MessageId::new("m1"), "Hello!");
    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.id.as_str(), "m1");
    assert_eq!(msg.content, "Hello!".to_string());
    assert_eq!(msg.message_type(), MessageType::Normal);
}

#[test]
fn it_executes_failed() {
    let msg = Message::failed();
    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.content, SEND_FAILED_TEXT);
    assert_eq!(msg.message_type(), MessageType::Error);
    assert!(msg.is_error());
}

#[test]
fn it_serializes_roles_lowercase() -> anyhow::Result<()> {
    let msg = Message::assistant(MessageId::new("m1"), "Hello!");
    let json = serde_json::to_value(&msg)?;
    assert_eq!(json["role"], "assistant");
    assert_eq!(json["id"], "m1");

    return Ok(());
}
