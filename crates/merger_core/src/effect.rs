use std::path::PathBuf;
use std::time::Duration;

use crate::{ArtifactKind, JobId, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Upload { job_id: JobId, path: PathBuf },
    StartProcessing { job_id: JobId, remote_job_id: String },
    /// Start the poll timer. Any previous timer has already been stopped.
    StartPolling { session_id: SessionId, interval: Duration },
    StopPolling { session_id: SessionId },
    FetchStatus { session_id: SessionId, job_id: JobId },
    Download { artifact: ArtifactKind },
    OpenFilePicker,
    /// Ask the user before abandoning the running job; a yes answers with `Msg::CancelConfirmed`.
    ConfirmCancel,
    ShowHelp,
}
