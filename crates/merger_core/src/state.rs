use std::time::{Duration, SystemTime};

use crate::{CompletionStats, ControllerConfig, JobError, Notice, ProgressEvent};

/// Ticket of one accepted submission. Allocated monotonically and never reused,
/// so a result carrying an old id can always be recognized as stale.
pub type JobId = u64;
pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Uploading,
    Processing,
    Complete,
    Error,
}

impl JobPhase {
    pub fn is_busy(self) -> bool {
        matches!(self, JobPhase::Uploading | JobPhase::Processing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobPhase::Complete | JobPhase::Error)
    }
}

/// Remote identity of a job, created once the upload has been accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub job_id: JobId,
    pub remote_job_id: String,
    pub file_count: u32,
    pub submitted_at: SystemTime,
}

/// The live timer + job pairing that drives status polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSession {
    pub session_id: SessionId,
    pub job_id: JobId,
    pub interval: Duration,
    /// A status request for this session has been issued and not answered yet.
    pub in_flight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    config: ControllerConfig,
    phase: JobPhase,
    last_job_id: JobId,
    last_session_id: SessionId,
    active_job: Option<JobId>,
    file_name: Option<String>,
    handle: Option<JobHandle>,
    poll: Option<PollSession>,
    progress: Option<ProgressEvent>,
    stats: Option<CompletionStats>,
    error: Option<JobError>,
    notice: Option<Notice>,
    consecutive_failures: u32,
    pending_polls: u32,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn job_handle(&self) -> Option<&JobHandle> {
        self.handle.as_ref()
    }

    pub fn poll_session(&self) -> Option<&PollSession> {
        self.poll.as_ref()
    }

    pub fn active_job(&self) -> Option<JobId> {
        self.active_job
    }

    pub fn progress(&self) -> Option<&ProgressEvent> {
        self.progress.as_ref()
    }

    pub fn completion_stats(&self) -> Option<&CompletionStats> {
        self.stats.as_ref()
    }

    pub fn error(&self) -> Option<&JobError> {
        self.error.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Returns true once if something visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_current_job(&self, job_id: JobId) -> bool {
        self.active_job == Some(job_id)
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.dirty = true;
    }

    pub(crate) fn dismiss_notice(&mut self) {
        if self.notice.take().is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn begin_upload(&mut self, file_name: String) -> JobId {
        self.last_job_id += 1;
        let job_id = self.last_job_id;
        self.phase = JobPhase::Uploading;
        self.active_job = Some(job_id);
        self.file_name = Some(file_name);
        self.handle = None;
        self.stats = None;
        self.error = None;
        self.notice = None;
        self.consecutive_failures = 0;
        self.pending_polls = 0;
        self.progress = Some(ProgressEvent::new(
            5,
            "Uploading file...",
            JobPhase::Uploading,
        ));
        self.dirty = true;
        job_id
    }

    pub(crate) fn attach_handle(&mut self, handle: JobHandle) {
        self.phase = JobPhase::Processing;
        self.handle = Some(handle);
        self.progress = Some(ProgressEvent::new(
            10,
            "Upload complete. Starting processing...",
            JobPhase::Processing,
        ));
        self.dirty = true;
    }

    /// Replaces any previous session. Returns the superseded session id, if any.
    pub(crate) fn open_poll_session(&mut self, job_id: JobId) -> (Option<SessionId>, SessionId) {
        let previous = self.close_poll_session();
        self.last_session_id += 1;
        let session_id = self.last_session_id;
        self.poll = Some(PollSession {
            session_id,
            job_id,
            interval: self.config.poll_interval,
            in_flight: false,
        });
        self.consecutive_failures = 0;
        self.pending_polls = 0;
        (previous, session_id)
    }

    pub(crate) fn close_poll_session(&mut self) -> Option<SessionId> {
        self.poll.take().map(|session| session.session_id)
    }

    /// The session is live and still belongs to the job currently held.
    pub(crate) fn session_matches(&self, session_id: SessionId, job_id: JobId) -> bool {
        let Some(session) = self.poll.as_ref() else {
            return false;
        };
        let handle_job = self.handle.as_ref().map(|handle| handle.job_id);
        session.session_id == session_id && session.job_id == job_id && handle_job == Some(job_id)
    }

    pub(crate) fn poll_session_mut(&mut self) -> Option<&mut PollSession> {
        self.poll.as_mut()
    }

    pub(crate) fn apply_progress(&mut self, event: ProgressEvent) {
        if self.progress.as_ref() != Some(&event) {
            self.progress = Some(event);
            self.dirty = true;
        }
    }

    /// Moves the job into `Complete`. Returns the session that must be stopped.
    pub(crate) fn complete(
        &mut self,
        event: ProgressEvent,
        stats: CompletionStats,
    ) -> Option<SessionId> {
        let stopped = self.close_poll_session();
        self.phase = JobPhase::Complete;
        self.progress = Some(event);
        self.stats = Some(stats);
        self.set_notice(Notice::new(
            crate::NoticeKind::Info,
            crate::Severity::Success,
            "Processing complete. The merged documents are ready to download.",
        ));
        stopped
    }

    /// Moves the job into `Error`. Returns the session that must be stopped.
    pub(crate) fn fail(&mut self, error: JobError, event: ProgressEvent) -> Option<SessionId> {
        let stopped = self.close_poll_session();
        self.phase = JobPhase::Error;
        self.set_notice(Notice::danger(error.notice_kind(), event.message().to_string()));
        self.progress = Some(event);
        self.error = Some(error);
        stopped
    }

    /// Back to `Idle`: the job handle, its session and every job-derived value are dropped.
    /// Returns the session that must be stopped.
    pub(crate) fn clear_job(&mut self) -> Option<SessionId> {
        let stopped = self.close_poll_session();
        self.phase = JobPhase::Idle;
        self.active_job = None;
        self.file_name = None;
        self.handle = None;
        self.progress = None;
        self.stats = None;
        self.error = None;
        self.notice = None;
        self.consecutive_failures = 0;
        self.pending_polls = 0;
        self.dirty = true;
        stopped
    }

    /// Records a failed poll and returns the new consecutive failure count.
    pub(crate) fn record_poll_failure(&mut self) -> u32 {
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    /// Records a "not ready yet" poll and returns the new consecutive count.
    pub(crate) fn record_pending_poll(&mut self) -> u32 {
        self.consecutive_failures = 0;
        self.pending_polls += 1;
        self.pending_polls
    }

    pub(crate) fn record_poll_answer(&mut self) {
        self.consecutive_failures = 0;
        self.pending_polls = 0;
    }
}
