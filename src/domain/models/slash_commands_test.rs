use super::SlashCommand;

#[test]
fn it_parse_empty_string() {
    let text = "";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_space_only() {
    let text = " ";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_single_slash() {
    let text = "/";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_invalid_prefix() {
    let text = "!q";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_plain_message() {
    let text = "What is a slash command?";
    assert!(SlashCommand::parse(text).is_none());
}

#[test]
fn it_parse_valid_prefix() {
    let text = "/q";
    let cmd = SlashCommand::parse(text);
    assert!(cmd.is_some());
    assert_eq!(cmd.unwrap().command, "/q");
}

#[test]
fn it_parse_surrounding_whitespace() {
    let cmd = SlashCommand::parse("   /clear   ").unwrap();
    assert!(cmd.is_clear());
}

#[test]
fn it_parse_ignores_trailing_words() {
    let cmd = SlashCommand::parse("/history  now please").unwrap();
    assert!(cmd.is_history());
    assert_eq!(cmd.command, "/history");
}

#[test]
fn it_is_quit() {
    for text in ["/q", "/quit", "/exit"] {
        assert!(SlashCommand::parse(text).unwrap().is_quit());
    }
}

#[test]
fn it_is_clear() {
    for text in ["/c", "/clear"] {
        assert!(SlashCommand::parse(text).unwrap().is_clear());
    }
}

#[test]
fn it_is_session() {
    for text in ["/s", "/session"] {
        assert!(SlashCommand::parse(text).unwrap().is_session());
    }
}

#[test]
fn it_is_help() {
    for text in ["/h", "/help"] {
        assert!(SlashCommand::parse(text).unwrap().is_help());
    }
}
