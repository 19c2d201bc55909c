use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use merger_engine::{
    Artifact, ChannelEventSink, EngineEvent, EngineHandle, StatusReport, Transport,
    TransportError, UploadAccepted,
};
use pretty_assertions::assert_eq;

const WAIT: Duration = Duration::from_secs(2);

#[derive(Default)]
struct ScriptedTransport {
    polls: AtomicUsize,
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn submit(&self, archive: &Path) -> Result<UploadAccepted, TransportError> {
        Ok(UploadAccepted {
            remote_id: archive.display().to_string(),
            file_count: 3,
        })
    }

    async fn start_processing(&self, _remote_id: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn poll_status(&self) -> Result<Option<StatusReport>, TransportError> {
        let count = self.polls.fetch_add(1, Ordering::SeqCst);
        if count == 0 {
            return Ok(None);
        }
        Ok(Some(StatusReport {
            current_step: Some("merge".to_string()),
            ..StatusReport::default()
        }))
    }

    async fn download(
        &self,
        artifact: Artifact,
        dest_dir: &Path,
    ) -> Result<PathBuf, TransportError> {
        Ok(dest_dir.join(artifact.file_name()))
    }
}

fn engine() -> (EngineHandle, mpsc::Receiver<EngineEvent>, Arc<ScriptedTransport>) {
    engine_logging::initialize_for_tests();
    let (tx, rx) = mpsc::channel();
    let transport = Arc::new(ScriptedTransport::default());
    let handle = EngineHandle::with_transport(
        transport.clone(),
        PathBuf::from("/tmp/merged"),
        Arc::new(ChannelEventSink::new(tx)),
    )
    .expect("engine");
    (handle, rx, transport)
}

#[test]
fn transport_results_come_back_tagged_with_their_identity() {
    let (engine, events, _) = engine();

    engine.upload(4, PathBuf::from("docs.zip"));
    assert_eq!(
        events.recv_timeout(WAIT).unwrap(),
        EngineEvent::Uploaded {
            job_id: 4,
            result: Ok(UploadAccepted {
                remote_id: "docs.zip".to_string(),
                file_count: 3,
            }),
        }
    );

    engine.start_processing(4, "docs.zip");
    assert_eq!(
        events.recv_timeout(WAIT).unwrap(),
        EngineEvent::ProcessingStarted {
            job_id: 4,
            result: Ok(()),
        }
    );

    engine.fetch_status(9, 4);
    assert_eq!(
        events.recv_timeout(WAIT).unwrap(),
        EngineEvent::Status {
            session_id: 9,
            job_id: 4,
            result: Ok(None),
        }
    );

    engine.download(Artifact::Pdf);
    assert_eq!(
        events.recv_timeout(WAIT).unwrap(),
        EngineEvent::Downloaded {
            artifact: Artifact::Pdf,
            result: Ok(PathBuf::from("/tmp/merged/merged.pdf")),
        }
    );
}

#[test]
fn poll_timer_emits_ticks_for_the_current_session_only() {
    let (engine, events, transport) = engine();

    engine.start_polling(1, Duration::from_millis(20));
    engine.stop_polling(1);
    engine.start_polling(2, Duration::from_millis(20));

    for _ in 0..3 {
        assert_eq!(
            events.recv_timeout(WAIT).unwrap(),
            EngineEvent::PollTick { session_id: 2 }
        );
    }

    engine.stop_polling(2);
    std::thread::sleep(Duration::from_millis(60));
    while events.try_recv().is_ok() {}
    std::thread::sleep(Duration::from_millis(80));
    assert!(events.try_recv().is_err());
    assert_eq!(transport.polls.load(Ordering::SeqCst), 0);
}

#[test]
fn stopping_an_old_session_keeps_the_new_timer() {
    let (engine, events, _) = engine();

    engine.start_polling(1, Duration::from_millis(20));
    engine.start_polling(2, Duration::from_millis(20));
    engine.stop_polling(1);

    assert_eq!(
        events.recv_timeout(WAIT).unwrap(),
        EngineEvent::PollTick { session_id: 2 }
    );
    engine.stop_polling(2);
}
