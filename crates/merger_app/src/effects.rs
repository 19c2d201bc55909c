//! Bridge between the pure controller and the engine.

use std::sync::mpsc;
use std::time::SystemTime;

use engine_logging::engine_debug;
use merger_core::{ArtifactKind, CompletionStats, Effect, Msg, RawStatus, UploadReceipt};
use merger_engine::{Artifact, EngineEvent, EngineHandle, EventSink, StatusReport};

/// Everything the event loop reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum AppInput {
    Msg(Msg),
    Line(String),
    InputClosed,
}

/// Effects that need the user rather than the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    ChooseFile,
    ConfirmCancel,
    Help,
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Hands I/O effects to the engine in order and returns the ones the UI must handle.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Prompt> {
        let mut prompts = Vec::new();
        for effect in effects {
            engine_debug!("Effect {:?}", effect);
            match effect {
                Effect::Upload { job_id, path } => self.engine.upload(job_id, path),
                Effect::StartProcessing {
                    job_id,
                    remote_job_id,
                } => self.engine.start_processing(job_id, remote_job_id),
                Effect::StartPolling {
                    session_id,
                    interval,
                } => self.engine.start_polling(session_id, interval),
                Effect::StopPolling { session_id } => self.engine.stop_polling(session_id),
                Effect::FetchStatus { session_id, job_id } => {
                    self.engine.fetch_status(session_id, job_id)
                }
                Effect::Download { artifact } => self.engine.download(to_engine_artifact(artifact)),
                Effect::OpenFilePicker => prompts.push(Prompt::ChooseFile),
                Effect::ConfirmCancel => prompts.push(Prompt::ConfirmCancel),
                Effect::ShowHelp => prompts.push(Prompt::Help),
            }
        }
        prompts
    }
}

/// Forwards engine events into the app's input channel as controller messages.
pub struct MsgSink {
    tx: mpsc::Sender<AppInput>,
}

impl MsgSink {
    pub fn new(tx: mpsc::Sender<AppInput>) -> Self {
        Self { tx }
    }
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let msg = event_to_msg(event, SystemTime::now());
        if self.tx.send(AppInput::Msg(msg)).is_err() {
            engine_debug!("Event loop gone; dropping engine event");
        }
    }
}

pub fn event_to_msg(event: EngineEvent, now: SystemTime) -> Msg {
    match event {
        EngineEvent::Uploaded { job_id, result } => Msg::UploadFinished {
            job_id,
            completed_at: now,
            result: result
                .map(|accepted| UploadReceipt {
                    remote_job_id: accepted.remote_id,
                    file_count: accepted.file_count,
                })
                .map_err(to_core_error),
        },
        EngineEvent::ProcessingStarted { job_id, result } => Msg::ProcessingStarted {
            job_id,
            result: result.map_err(to_core_error),
        },
        EngineEvent::PollTick { session_id } => Msg::PollTick { session_id },
        EngineEvent::Status {
            session_id,
            job_id,
            result,
        } => Msg::StatusReceived {
            session_id,
            job_id,
            result: result
                .map(|report| report.map(to_raw_status))
                .map_err(to_core_error),
        },
        EngineEvent::Downloaded { artifact, result } => Msg::DownloadFinished {
            artifact: to_core_artifact(artifact),
            result: result.map_err(to_core_error),
        },
    }
}

fn to_core_error(err: merger_engine::TransportError) -> merger_core::TransportError {
    if err.is_retryable() {
        merger_core::TransportError::retryable(err.message)
    } else {
        merger_core::TransportError::terminal(err.message)
    }
}

fn to_raw_status(report: StatusReport) -> RawStatus {
    RawStatus {
        complete: report.complete,
        current_step: report.current_step,
        percent: report.percent,
        status_text: report.status_text,
        error: report.error,
        file_count: report.file_count,
        stats: report.stats.map(|stats| CompletionStats {
            file_count: stats.file_count,
            processing_time_secs: stats
                .processing_time
                .filter(|secs| secs.is_finite())
                .map(|secs| secs.max(0.0).round() as u64),
        }),
    }
}

fn to_engine_artifact(artifact: ArtifactKind) -> Artifact {
    match artifact {
        ArtifactKind::Docx => Artifact::Docx,
        ArtifactKind::Pdf => Artifact::Pdf,
    }
}

fn to_core_artifact(artifact: Artifact) -> ArtifactKind {
    match artifact {
        Artifact::Docx => ArtifactKind::Docx,
        Artifact::Pdf => ArtifactKind::Pdf,
    }
}
