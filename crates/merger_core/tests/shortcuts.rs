use std::time::SystemTime;

use merger_core::{
    update, word_to_trigger, AppState, ArchiveCandidate, ArtifactKind, Effect, JobPhase, Msg,
    NoticeKind, RawStatus, Trigger, UploadReceipt, SHORTCUTS,
};

fn completed_state() -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::FileSubmitted(ArchiveCandidate::from_path("/data/docs.zip")),
    );
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            job_id: 1,
            completed_at: SystemTime::UNIX_EPOCH,
            result: Ok(UploadReceipt {
                remote_job_id: "r1".to_string(),
                file_count: 2,
            }),
        },
    );
    let (state, _) = update(
        state,
        Msg::ProcessingStarted {
            job_id: 1,
            result: Ok(()),
        },
    );
    let (state, _) = update(state, Msg::PollTick { session_id: 1 });
    let (state, _) = update(
        state,
        Msg::StatusReceived {
            session_id: 1,
            job_id: 1,
            result: Ok(Some(RawStatus {
                complete: true,
                ..RawStatus::default()
            })),
        },
    );
    assert_eq!(state.phase(), JobPhase::Complete);
    state
}

#[test]
fn downloads_before_completion_only_show_a_notice() {
    let (state, effects) = update(AppState::new(), Msg::Trigger(Trigger::DownloadPrimary));
    assert!(effects.is_empty());
    assert_eq!(state.phase(), JobPhase::Idle);
    assert_eq!(
        state.notice().map(|notice| notice.kind),
        Some(NoticeKind::Unavailable)
    );

    let (state, effects) = update(state, Msg::Trigger(Trigger::DownloadSecondary));
    assert!(effects.is_empty());
    assert!(state
        .notice()
        .is_some_and(|notice| notice.text.contains("PDF")));
}

#[test]
fn downloads_after_completion_request_the_artifact() {
    let state = completed_state();
    let (state, effects) = update(state, Msg::Trigger(Trigger::DownloadPrimary));
    assert_eq!(
        effects,
        vec![Effect::Download {
            artifact: ArtifactKind::Docx
        }]
    );
    let (_, effects) = update(state, Msg::Trigger(Trigger::DownloadSecondary));
    assert_eq!(
        effects,
        vec![Effect::Download {
            artifact: ArtifactKind::Pdf
        }]
    );
}

#[test]
fn reset_trigger_only_resets_terminal_jobs_directly() {
    let (state, effects) = update(completed_state(), Msg::Trigger(Trigger::Reset));
    assert!(effects.is_empty());
    assert_eq!(state.phase(), JobPhase::Idle);

    let (state, _) = update(
        state,
        Msg::FileSubmitted(ArchiveCandidate::from_path("/data/docs.zip")),
    );
    let (state, effects) = update(state, Msg::Trigger(Trigger::Reset));
    assert_eq!(effects, vec![Effect::ConfirmCancel]);
    assert_eq!(state.phase(), JobPhase::Uploading);
}

#[test]
fn cancel_trigger_requires_a_busy_job() {
    let (state, effects) = update(AppState::new(), Msg::Trigger(Trigger::CancelInFlight));
    assert!(effects.is_empty());
    assert_eq!(state.phase(), JobPhase::Idle);

    let (state, effects) = update(completed_state(), Msg::Trigger(Trigger::CancelInFlight));
    assert!(effects.is_empty());
    assert_eq!(state.phase(), JobPhase::Complete);

    let (state, _) = update(
        AppState::new(),
        Msg::FileSubmitted(ArchiveCandidate::from_path("/data/docs.zip")),
    );
    let (state, effects) = update(state, Msg::Trigger(Trigger::CancelInFlight));
    assert_eq!(effects, vec![Effect::ConfirmCancel]);
    let (state, _) = update(state, Msg::CancelConfirmed);
    assert_eq!(state.phase(), JobPhase::Idle);
}

#[test]
fn picker_and_help_are_not_phase_gated() {
    for state in [AppState::new(), completed_state()] {
        let (_, effects) = update(state.clone(), Msg::Trigger(Trigger::ShowHelp));
        assert_eq!(effects, vec![Effect::ShowHelp]);
        let (next, effects) = update(state.clone(), Msg::Trigger(Trigger::OpenFilePicker));
        assert_eq!(effects, vec![Effect::OpenFilePicker]);
        assert_eq!(next.phase(), state.phase());
    }
}

#[test]
fn every_shortcut_word_resolves_to_its_trigger() {
    for shortcut in SHORTCUTS {
        assert_eq!(word_to_trigger(shortcut.word), Some(shortcut.trigger));
    }
    assert_eq!(word_to_trigger("  DOCX "), Some(Trigger::DownloadPrimary));
    assert_eq!(word_to_trigger("print"), None);
}
