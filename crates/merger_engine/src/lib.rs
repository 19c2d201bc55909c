//! Merger engine: HTTP transport, poll timer and effect execution.
mod engine;
mod persist;
mod timer;
mod transport;
mod types;

pub use engine::EngineHandle;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use timer::PollTimer;
pub use transport::{ReqwestTransport, Transport, TransportSettings};
pub use types::{
    Artifact, ChannelEventSink, EngineError, EngineEvent, EventSink, FailureKind, JobId,
    SessionId, StatusReport, StatusStats, TransportError, UploadAccepted,
};
