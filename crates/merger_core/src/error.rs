use thiserror::Error;

/// Failure reported by the transport for one remote call, as seen by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
    /// Network blips, 5xx and "not found yet" are retryable; validation-type 4xx are not.
    pub retryable: bool,
}

impl TransportError {
    pub fn retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }
}

/// Why a job failed. Rejected commands only raise a notice and never reach here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("{message}")]
    Transport { message: String, retryable: bool },
    #[error("{0}")]
    RemoteProcessing(String),
    #[error("no usable status after {attempts} attempts")]
    PollTimeout { attempts: u32 },
}

impl JobError {
    /// Error detail preserved for display, verbatim from the server where available.
    pub fn detail(&self) -> String {
        self.to_string()
    }

    pub fn notice_kind(&self) -> NoticeKind {
        match self {
            JobError::Transport { .. } => NoticeKind::TransportFailure,
            JobError::RemoteProcessing(_) => NoticeKind::RemoteProcessing,
            JobError::PollTimeout { .. } => NoticeKind::PollTimeout,
        }
    }
}

impl From<TransportError> for JobError {
    fn from(err: TransportError) -> Self {
        JobError::Transport {
            message: err.message,
            retryable: err.retryable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Validation,
    ConcurrencyRejection,
    ResetRequired,
    TransportFailure,
    RemoteProcessing,
    PollTimeout,
    Unavailable,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

/// Dismissible, non-blocking user notice. Only the latest one is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub severity: Severity,
    pub text: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            text: text.into(),
        }
    }

    pub(crate) fn info(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self::new(kind, Severity::Info, text)
    }

    pub(crate) fn warning(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, text)
    }

    pub(crate) fn danger(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self::new(kind, Severity::Danger, text)
    }
}
