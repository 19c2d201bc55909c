use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info};

use crate::timer::PollTimer;
use crate::transport::{ReqwestTransport, Transport, TransportSettings};
use crate::{Artifact, EngineError, EngineEvent, EventSink, JobId, SessionId};

enum EngineCommand {
    Upload { job_id: JobId, path: PathBuf },
    StartProcessing { job_id: JobId, remote_id: String },
    FetchStatus { session_id: SessionId, job_id: JobId },
    StartPolling { session_id: SessionId, interval: Duration },
    StopPolling { session_id: SessionId },
    Download { artifact: Artifact },
}

/// Executes I/O on a private tokio runtime and reports every result to the sink.
///
/// Commands are processed in the order they are sent, so a `StopPolling`
/// followed by a `StartPolling` never leaves two timers running.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        settings: TransportSettings,
        output_dir: PathBuf,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let transport = ReqwestTransport::new(settings)?;
        Self::with_transport(Arc::new(transport), output_dir, sink)
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        output_dir: PathBuf,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("merger-engine")
            .build()?;

        thread::spawn(move || {
            let mut timer = PollTimer::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartPolling {
                        session_id,
                        interval,
                    } => {
                        engine_debug!("Starting poll session {} every {:?}", session_id, interval);
                        timer.start(runtime.handle(), session_id, interval, sink.clone());
                    }
                    EngineCommand::StopPolling { session_id } => {
                        if !timer.stop(session_id) {
                            engine_debug!("Poll session {} was not running", session_id);
                        }
                    }
                    command => {
                        let transport = transport.clone();
                        let sink = sink.clone();
                        let output_dir = output_dir.clone();
                        runtime.spawn(async move {
                            handle_command(transport.as_ref(), &output_dir, command, sink.as_ref())
                                .await;
                        });
                    }
                }
            }
            timer.stop_all();
            engine_info!("Engine stopped");
        });

        Ok(Self { cmd_tx })
    }

    pub fn upload(&self, job_id: JobId, path: PathBuf) {
        self.send(EngineCommand::Upload { job_id, path });
    }

    pub fn start_processing(&self, job_id: JobId, remote_id: impl Into<String>) {
        self.send(EngineCommand::StartProcessing {
            job_id,
            remote_id: remote_id.into(),
        });
    }

    pub fn fetch_status(&self, session_id: SessionId, job_id: JobId) {
        self.send(EngineCommand::FetchStatus { session_id, job_id });
    }

    pub fn start_polling(&self, session_id: SessionId, interval: Duration) {
        self.send(EngineCommand::StartPolling {
            session_id,
            interval,
        });
    }

    pub fn stop_polling(&self, session_id: SessionId) {
        self.send(EngineCommand::StopPolling { session_id });
    }

    pub fn download(&self, artifact: Artifact) {
        self.send(EngineCommand::Download { artifact });
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_command(
    transport: &dyn Transport,
    output_dir: &Path,
    command: EngineCommand,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::Upload { job_id, path } => {
            let result = transport.submit(&path).await;
            sink.emit(EngineEvent::Uploaded { job_id, result });
        }
        EngineCommand::StartProcessing { job_id, remote_id } => {
            let result = transport.start_processing(&remote_id).await;
            sink.emit(EngineEvent::ProcessingStarted { job_id, result });
        }
        EngineCommand::FetchStatus { session_id, job_id } => {
            let result = transport.poll_status().await;
            sink.emit(EngineEvent::Status {
                session_id,
                job_id,
                result,
            });
        }
        EngineCommand::Download { artifact } => {
            let result = transport.download(artifact, output_dir).await;
            sink.emit(EngineEvent::Downloaded { artifact, result });
        }
        EngineCommand::StartPolling { .. } | EngineCommand::StopPolling { .. } => {}
    }
}
