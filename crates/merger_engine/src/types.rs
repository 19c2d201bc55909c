use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc;

use serde::Deserialize;
use thiserror::Error;

pub type JobId = u64;
pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Docx,
    Pdf,
}

impl Artifact {
    pub fn as_str(self) -> &'static str {
        match self {
            Artifact::Docx => "docx",
            Artifact::Pdf => "pdf",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::Docx => "merged.docx",
            Artifact::Pdf => "merged.pdf",
        }
    }
}

/// The server accepted an archive; `remote_id` is the `zip_path` it reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAccepted {
    pub remote_id: String,
    pub file_count: u32,
}

/// `GET /status` body. Both payload dialects share these optional fields.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StatusReport {
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub current_step: Option<String>,
    #[serde(default)]
    pub percent: Option<f64>,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub file_count: Option<u32>,
    #[serde(default)]
    pub stats: Option<StatusStats>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StatusStats {
    #[serde(default)]
    pub processing_time: Option<f64>,
    #[serde(default)]
    pub file_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Io,
    Timeout,
    Network,
    HttpStatus(u16),
    /// The server answered `{"success": false}`.
    Rejected,
    Decode,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnexpectedContent { content_type: String },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Io => write!(f, "i/o error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Rejected => write!(f, "rejected by server"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnexpectedContent { content_type } => {
                write!(f, "unexpected content type {content_type}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Network blips, timeouts, 5xx and "not found yet" may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            FailureKind::Timeout | FailureKind::Network => true,
            FailureKind::HttpStatus(code) => code == 404 || (500..600).contains(&code),
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start the engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Uploaded {
        job_id: JobId,
        result: Result<UploadAccepted, TransportError>,
    },
    ProcessingStarted {
        job_id: JobId,
        result: Result<(), TransportError>,
    },
    PollTick {
        session_id: SessionId,
    },
    Status {
        session_id: SessionId,
        job_id: JobId,
        result: Result<Option<StatusReport>, TransportError>,
    },
    Downloaded {
        artifact: Artifact,
        result: Result<PathBuf, TransportError>,
    },
}

/// Receives every event the engine produces, from any of its threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
