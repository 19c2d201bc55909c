//! Turns typed lines into controller messages.

use merger_core::{key_to_trigger, word_to_trigger, ArchiveCandidate, KeyChord, Msg};

use crate::effects::Prompt;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    Quit,
    /// Nothing to do (empty line, declined prompt).
    Ignore,
    Unknown(String),
}

/// `prompt` is the question the UI is currently waiting on, if any.
pub fn parse_line(line: &str, prompt: Option<Prompt>) -> Command {
    let text = line.trim();
    match prompt {
        Some(Prompt::ConfirmCancel) => {
            return if matches!(text.to_ascii_lowercase().as_str(), "y" | "yes") {
                Command::Dispatch(Msg::CancelConfirmed)
            } else {
                Command::Ignore
            };
        }
        Some(Prompt::ChooseFile) => {
            return if text.is_empty() {
                Command::Ignore
            } else {
                Command::Dispatch(Msg::FileSubmitted(ArchiveCandidate::from_path(text)))
            };
        }
        Some(Prompt::Help) | None => {}
    }

    if text.is_empty() {
        return Command::Ignore;
    }
    let lower = text.to_ascii_lowercase();
    match lower.as_str() {
        "q" | "quit" | "exit" => return Command::Quit,
        "dismiss" | "ok" => return Command::Dispatch(Msg::NoticeDismissed),
        _ => {}
    }
    if let Some(trigger) = parse_chord(&lower).and_then(key_to_trigger) {
        return Command::Dispatch(Msg::Trigger(trigger));
    }
    if let Some(trigger) = word_to_trigger(&lower) {
        return Command::Dispatch(Msg::Trigger(trigger));
    }
    if lower.starts_with("upload ") {
        let path = text["upload ".len()..].trim();
        return Command::Dispatch(Msg::FileSubmitted(ArchiveCandidate::from_path(path)));
    }
    if text.contains(['/', '\\', '.']) {
        return Command::Dispatch(Msg::FileSubmitted(ArchiveCandidate::from_path(text)));
    }
    Command::Unknown(text.to_string())
}

/// Accepts `ctrl+o`, `ctrl-o`, `^o`, `esc` and `escape`.
pub fn parse_chord(text: &str) -> Option<KeyChord> {
    let text = text.trim().to_ascii_lowercase();
    if text == "esc" || text == "escape" {
        return Some(KeyChord::Escape);
    }
    let key = text
        .strip_prefix("ctrl+")
        .or_else(|| text.strip_prefix("ctrl-"))
        .or_else(|| text.strip_prefix('^'))?;
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_alphabetic() => Some(KeyChord::Ctrl(ch)),
        _ => None,
    }
}
