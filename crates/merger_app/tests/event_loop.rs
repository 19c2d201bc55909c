//! Drives the full loop (controller, effect runner, engine) against a scripted transport.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, SystemTime};

use merger_app::effects::{event_to_msg, AppInput, EffectRunner, MsgSink, Prompt};
use merger_app::{App, Flow};
use merger_core::{
    AppState, ArchiveCandidate, ArtifactKind, CompletionStats, ControllerConfig, JobPhase, Msg,
    RawStatus,
};
use merger_engine::{
    Artifact, EngineEvent, EngineHandle, FailureKind, StatusReport, StatusStats, Transport,
    TransportError, UploadAccepted,
};
use pretty_assertions::assert_eq;

type StatusScript = VecDeque<Result<Option<StatusReport>, TransportError>>;

struct ScriptedTransport {
    upload: Result<UploadAccepted, TransportError>,
    statuses: Mutex<StatusScript>,
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn submit(&self, _archive: &Path) -> Result<UploadAccepted, TransportError> {
        self.upload.clone()
    }

    async fn start_processing(&self, _remote_id: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn poll_status(&self) -> Result<Option<StatusReport>, TransportError> {
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(None))
    }

    async fn download(
        &self,
        artifact: Artifact,
        dest_dir: &Path,
    ) -> Result<PathBuf, TransportError> {
        Ok(dest_dir.join(artifact.file_name()))
    }
}

fn step(name: &str) -> Result<Option<StatusReport>, TransportError> {
    Ok(Some(StatusReport {
        current_step: Some(name.to_string()),
        ..StatusReport::default()
    }))
}

fn run_to_end(transport: ScriptedTransport) -> (App<Vec<u8>>, Vec<u8>) {
    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::with_transport(
        Arc::new(transport),
        PathBuf::from("/tmp/merged"),
        Arc::new(MsgSink::new(tx)),
    )
    .expect("engine");
    let state = AppState::with_config(ControllerConfig {
        poll_interval: Duration::from_millis(10),
        ..ControllerConfig::default()
    });
    let mut app = App::new(state, EffectRunner::new(engine), true, Vec::new());
    app.start(Some(ArchiveCandidate::from_path("/data/docs.zip")))
        .unwrap();

    loop {
        let input = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("event loop stalled");
        if app.handle(input).unwrap() == Flow::Quit {
            break;
        }
    }
    let output = app.output().clone();
    (app, output)
}

#[test]
fn job_runs_from_upload_to_completion() {
    let transport = ScriptedTransport {
        upload: Ok(UploadAccepted {
            remote_id: "uploads/docs.zip".to_string(),
            file_count: 4,
        }),
        statuses: Mutex::new(VecDeque::from([
            Ok(None),
            step("extract"),
            Err(TransportError::new(FailureKind::Network, "blip")),
            step("convert"),
            Ok(Some(StatusReport {
                complete: true,
                stats: Some(StatusStats {
                    processing_time: Some(3.6),
                    file_count: Some(4),
                }),
                ..StatusReport::default()
            })),
        ])),
    };

    let (app, output) = run_to_end(transport);
    let output = String::from_utf8(output).unwrap();

    assert_eq!(app.state().phase(), JobPhase::Complete);
    assert!(app.state().poll_session().is_none());
    assert!(output.contains("Extracting files from the ZIP archive..."));
    assert!(output.contains("Converting files..."));
    assert!(output.contains("Merge complete: 4 files in 4 s"));
}

#[test]
fn rejected_upload_ends_in_error() {
    let transport = ScriptedTransport {
        upload: Err(TransportError::new(
            FailureKind::Rejected,
            "Only ZIP files are allowed",
        )),
        statuses: Mutex::new(VecDeque::new()),
    };

    let (app, output) = run_to_end(transport);
    let output = String::from_utf8(output).unwrap();

    assert_eq!(app.state().phase(), JobPhase::Error);
    assert!(output.contains("Only ZIP files are allowed"));
    assert!(output.contains("[error]"));
}

#[test]
fn shortcuts_prompt_before_acting() {
    let (tx, _rx) = mpsc::channel();
    let engine = EngineHandle::with_transport(
        Arc::new(ScriptedTransport {
            upload: Ok(UploadAccepted {
                remote_id: "r".to_string(),
                file_count: 1,
            }),
            statuses: Mutex::new(VecDeque::new()),
        }),
        PathBuf::from("/tmp/merged"),
        Arc::new(MsgSink::new(tx)),
    )
    .unwrap();
    let mut app = App::new(AppState::new(), EffectRunner::new(engine), false, Vec::new());
    app.start(None).unwrap();

    app.handle(AppInput::Line("ctrl+o".to_string())).unwrap();
    assert_eq!(app.prompt(), Some(Prompt::ChooseFile));
    app.handle(AppInput::Line("notes.txt".to_string())).unwrap();
    assert_eq!(app.prompt(), None);
    assert_eq!(app.state().phase(), JobPhase::Idle);
    assert!(app.state().notice().is_some());

    app.handle(AppInput::Line("/data/docs.zip".to_string()))
        .unwrap();
    assert_eq!(app.state().phase(), JobPhase::Uploading);
    app.handle(AppInput::Line("esc".to_string())).unwrap();
    assert_eq!(app.prompt(), Some(Prompt::ConfirmCancel));
    app.handle(AppInput::Line("n".to_string())).unwrap();
    assert_eq!(app.state().phase(), JobPhase::Uploading);

    app.handle(AppInput::Line("cancel".to_string())).unwrap();
    app.handle(AppInput::Line("y".to_string())).unwrap();
    assert_eq!(app.state().phase(), JobPhase::Idle);

    let flow = app.handle(AppInput::InputClosed).unwrap();
    assert_eq!(flow, Flow::Quit);
    let output = String::from_utf8(app.output().clone()).unwrap();
    assert!(output.contains("Path to ZIP archive: "));
    assert!(output.contains("Cancel the running job? [y/N] "));
}

fn app_without_events(exit_when_done: bool) -> App<Vec<u8>> {
    let (tx, _rx) = mpsc::channel();
    let engine = EngineHandle::with_transport(
        Arc::new(ScriptedTransport {
            upload: Err(TransportError::new(FailureKind::Network, "never answered")),
            statuses: Mutex::new(VecDeque::new()),
        }),
        PathBuf::from("/tmp/merged"),
        Arc::new(MsgSink::new(tx)),
    )
    .unwrap();
    App::new(AppState::new(), EffectRunner::new(engine), exit_when_done, Vec::new())
}

#[test]
fn closed_input_quits_after_a_rejected_archive_even_when_waiting_for_the_job() {
    let mut app = app_without_events(true);
    app.start(Some(ArchiveCandidate::from_path("/data/notes.docx")))
        .unwrap();
    assert_eq!(app.state().phase(), JobPhase::Idle);
    assert!(app.state().notice().is_some());

    let flow = app.handle(AppInput::InputClosed).unwrap();
    assert_eq!(flow, Flow::Quit);
}

#[test]
fn closed_input_waits_for_a_running_job() {
    let mut app = app_without_events(true);
    app.start(Some(ArchiveCandidate::from_path("/data/docs.zip")))
        .unwrap();
    assert_eq!(app.state().phase(), JobPhase::Uploading);

    let flow = app.handle(AppInput::InputClosed).unwrap();
    assert_eq!(flow, Flow::Continue);
}

#[test]
fn engine_events_translate_to_controller_messages() {
    let now = SystemTime::UNIX_EPOCH;
    let msg = event_to_msg(
        EngineEvent::Status {
            session_id: 3,
            job_id: 2,
            result: Ok(Some(StatusReport {
                complete: true,
                stats: Some(StatusStats {
                    processing_time: Some(12.4),
                    file_count: Some(20),
                }),
                ..StatusReport::default()
            })),
        },
        now,
    );
    assert_eq!(
        msg,
        Msg::StatusReceived {
            session_id: 3,
            job_id: 2,
            result: Ok(Some(RawStatus {
                complete: true,
                stats: Some(CompletionStats {
                    file_count: Some(20),
                    processing_time_secs: Some(12),
                }),
                ..RawStatus::default()
            })),
        }
    );

    let msg = event_to_msg(
        EngineEvent::Status {
            session_id: 3,
            job_id: 2,
            result: Err(TransportError::new(FailureKind::HttpStatus(503), "down")),
        },
        now,
    );
    assert_eq!(
        msg,
        Msg::StatusReceived {
            session_id: 3,
            job_id: 2,
            result: Err(merger_core::TransportError::retryable("down")),
        }
    );

    let msg = event_to_msg(
        EngineEvent::Downloaded {
            artifact: Artifact::Pdf,
            result: Err(TransportError::new(
                FailureKind::UnexpectedContent {
                    content_type: "text/html".to_string(),
                },
                "missing",
            )),
        },
        now,
    );
    assert_eq!(
        msg,
        Msg::DownloadFinished {
            artifact: ArtifactKind::Pdf,
            result: Err(merger_core::TransportError::terminal("missing")),
        }
    );
}
