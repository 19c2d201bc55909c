use merger_app::effects::Prompt;
use merger_app::input::{parse_chord, parse_line, Command};
use merger_core::{ArchiveCandidate, KeyChord, Msg, Trigger};
use pretty_assertions::assert_eq;

#[test]
fn chords_and_words_map_to_triggers() {
    let cases = [
        ("ctrl+o", Trigger::OpenFilePicker),
        ("Ctrl-D", Trigger::DownloadPrimary),
        ("^p", Trigger::DownloadSecondary),
        ("esc", Trigger::CancelInFlight),
        ("reset", Trigger::Reset),
        ("HELP", Trigger::ShowHelp),
    ];
    for (line, trigger) in cases {
        assert_eq!(
            parse_line(line, None),
            Command::Dispatch(Msg::Trigger(trigger)),
            "{line}"
        );
    }
}

#[test]
fn paths_are_submitted_as_candidates() {
    assert_eq!(
        parse_line("upload /data/My Docs.zip", None),
        Command::Dispatch(Msg::FileSubmitted(ArchiveCandidate::from_path(
            "/data/My Docs.zip"
        )))
    );
    assert_eq!(
        parse_line("  ./docs.zip ", None),
        Command::Dispatch(Msg::FileSubmitted(ArchiveCandidate::from_path(
            "./docs.zip"
        )))
    );
}

#[test]
fn cancel_prompt_needs_an_explicit_yes() {
    let prompt = Some(Prompt::ConfirmCancel);
    assert_eq!(
        parse_line("y", prompt),
        Command::Dispatch(Msg::CancelConfirmed)
    );
    assert_eq!(
        parse_line("YES", prompt),
        Command::Dispatch(Msg::CancelConfirmed)
    );
    assert_eq!(parse_line("", prompt), Command::Ignore);
    assert_eq!(parse_line("quit", prompt), Command::Ignore);
}

#[test]
fn file_prompt_takes_the_line_as_a_path() {
    let prompt = Some(Prompt::ChooseFile);
    assert_eq!(
        parse_line("archive", prompt),
        Command::Dispatch(Msg::FileSubmitted(ArchiveCandidate::from_path("archive")))
    );
    assert_eq!(parse_line("   ", prompt), Command::Ignore);
}

#[test]
fn misc_commands() {
    assert_eq!(parse_line("q", None), Command::Quit);
    assert_eq!(parse_line("dismiss", None), Command::Dispatch(Msg::NoticeDismissed));
    assert_eq!(parse_line("", None), Command::Ignore);
    assert_eq!(
        parse_line("print", None),
        Command::Unknown("print".to_string())
    );
}

#[test]
fn chord_parsing_rejects_malformed_input() {
    assert_eq!(parse_chord("Escape"), Some(KeyChord::Escape));
    assert_eq!(parse_chord("ctrl+x"), Some(KeyChord::Ctrl('x')));
    assert_eq!(parse_chord("ctrl+"), None);
    assert_eq!(parse_chord("ctrl+ab"), None);
    assert_eq!(parse_chord("ctrl+1"), None);
    assert_eq!(parse_chord("o"), None);
}
