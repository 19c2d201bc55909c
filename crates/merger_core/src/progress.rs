use crate::JobPhase;

/// Normalized snapshot of remote progress. Built by the status interpreter or
/// by the controller for its own upload milestones; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    percent: u8,
    message: String,
    phase: JobPhase,
    error_detail: Option<String>,
    step: Option<String>,
}

impl ProgressEvent {
    pub fn new(percent: u8, message: impl Into<String>, phase: JobPhase) -> Self {
        Self {
            percent: percent.min(100),
            message: message.into(),
            phase,
            error_detail: None,
            step: None,
        }
    }

    pub fn failed(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            percent: 0,
            message: message.into(),
            phase: JobPhase::Error,
            error_detail: Some(detail.into()),
            step: None,
        }
    }

    pub fn with_step(mut self, step: Option<String>) -> Self {
        self.step = step;
        self
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    /// Remote `current_step` this event was derived from, if any.
    pub fn step(&self) -> Option<&str> {
        self.step.as_deref()
    }
}

/// Figures reported by the server once the merge has finished.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionStats {
    pub file_count: Option<u32>,
    pub processing_time_secs: Option<u64>,
}
