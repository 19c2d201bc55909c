use std::path::PathBuf;
use std::time::SystemTime;

use crate::{ArtifactKind, JobId, RawStatus, SessionId, TransportError, Trigger};

/// A file the user picked or dropped, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveCandidate {
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: Option<String>,
}

impl ArchiveCandidate {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            content_type: None,
        }
    }
}

/// What the server hands back for an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub remote_job_id: String,
    pub file_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted an archive for merging.
    FileSubmitted(ArchiveCandidate),
    /// The upload request for `job_id` resolved.
    UploadFinished {
        job_id: JobId,
        completed_at: SystemTime,
        result: Result<UploadReceipt, TransportError>,
    },
    /// The start-processing request for `job_id` resolved.
    ProcessingStarted {
        job_id: JobId,
        result: Result<(), TransportError>,
    },
    /// The poll timer of `session_id` fired.
    PollTick { session_id: SessionId },
    /// A status request resolved. `Ok(None)` means the status is not available yet.
    StatusReceived {
        session_id: SessionId,
        job_id: JobId,
        result: Result<Option<RawStatus>, TransportError>,
    },
    /// User confirmed they want to abandon the running job.
    CancelConfirmed,
    /// User clicked Reset.
    ResetRequested,
    /// Keyboard shortcut or other out-of-band intent.
    Trigger(Trigger),
    /// An artifact download resolved; `Ok` carries where it was saved.
    DownloadFinished {
        artifact: ArtifactKind,
        result: Result<PathBuf, TransportError>,
    },
    /// User closed the current notice.
    NoticeDismissed,
    NoOp,
}
