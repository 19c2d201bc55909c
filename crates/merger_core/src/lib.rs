//! Merger core: pure job lifecycle state machine and view-model helpers.
mod config;
mod effect;
mod error;
mod msg;
mod progress;
mod shortcuts;
mod state;
mod status;
mod update;
mod view_model;

pub use config::ControllerConfig;
pub use effect::Effect;
pub use error::{JobError, Notice, NoticeKind, Severity, TransportError};
pub use msg::{ArchiveCandidate, Msg, UploadReceipt};
pub use progress::{CompletionStats, ProgressEvent};
pub use shortcuts::{key_to_trigger, word_to_trigger, ArtifactKind, KeyChord, Shortcut, Trigger, SHORTCUTS};
pub use state::{AppState, JobHandle, JobId, JobPhase, PollSession, SessionId};
pub use status::{interpret, Interpretation, LegacyStep, RawStatus, StatusPayload};
pub use update::update;
pub use view_model::{
    ActionsView, AppViewModel, DownloadAction, ProgressStyle, ProgressView, ResultCardView,
};
