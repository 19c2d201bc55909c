//! Status interpreter: turns the loosely-shaped `/status` payload into one
//! canonical [`ProgressEvent`].
//!
//! The server speaks two dialects. Newer payloads carry an explicit `percent`
//! and `status_text`; older ones only name the current step and leave the
//! percentage to the client. Both are resolved exactly once, here.

use crate::{CompletionStats, JobPhase, ProgressEvent};

const UNKNOWN_ERROR: &str = "Unknown error";

/// Status payload as decoded from the wire. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawStatus {
    pub complete: bool,
    pub current_step: Option<String>,
    pub percent: Option<f64>,
    pub status_text: Option<String>,
    pub error: Option<String>,
    pub file_count: Option<u32>,
    pub stats: Option<CompletionStats>,
}

/// Step keywords understood without an explicit percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyStep {
    Extract,
    Convert,
    Merge,
    Pdf,
}

impl LegacyStep {
    fn percent(self) -> u8 {
        match self {
            LegacyStep::Extract => 10,
            LegacyStep::Convert => 30,
            LegacyStep::Merge => 50,
            LegacyStep::Pdf => 80,
        }
    }

    fn message(self) -> &'static str {
        match self {
            LegacyStep::Extract => "Extracting files from the ZIP archive...",
            LegacyStep::Convert => "Converting files...",
            LegacyStep::Merge => "Merging documents...",
            LegacyStep::Pdf => "Converting the merged document to PDF...",
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            LegacyStep::Extract => "extract",
            LegacyStep::Convert => "convert",
            LegacyStep::Merge => "merge",
            LegacyStep::Pdf => "pdf",
        }
    }
}

/// A raw payload resolved into exactly one known shape.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusPayload {
    Complete(CompletionStats),
    Failed { error: Option<String> },
    Canonical {
        percent: f64,
        status_text: String,
        step: Option<String>,
    },
    Legacy(LegacyStep),
    Unrecognized { step: Option<String> },
}

impl StatusPayload {
    /// Precedence: `complete` flag, then the error step, then the canonical
    /// fields, then the step keyword.
    pub fn classify(raw: &RawStatus) -> Self {
        let step = raw.current_step.as_deref().map(str::trim);
        if raw.complete || step == Some("complete") {
            return StatusPayload::Complete(completion_stats(raw));
        }
        if step == Some("error") {
            return StatusPayload::Failed {
                error: raw.error.clone(),
            };
        }
        if let (Some(percent), Some(text)) = (raw.percent, raw.status_text.as_deref()) {
            if !text.is_empty() {
                return StatusPayload::Canonical {
                    percent,
                    status_text: text.to_string(),
                    step: raw.current_step.clone(),
                };
            }
        }
        match step {
            Some("extract") => StatusPayload::Legacy(LegacyStep::Extract),
            Some("convert") => StatusPayload::Legacy(LegacyStep::Convert),
            Some("merge") => StatusPayload::Legacy(LegacyStep::Merge),
            Some("pdf") => StatusPayload::Legacy(LegacyStep::Pdf),
            _ => StatusPayload::Unrecognized {
                step: raw.current_step.clone(),
            },
        }
    }
}

/// Outcome of interpreting one status payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Progress(ProgressEvent),
    Completed {
        event: ProgressEvent,
        stats: CompletionStats,
    },
    Failed(ProgressEvent),
    /// Unknown step or a payload without any usable field.
    Ignored { step: Option<String> },
}

pub fn interpret(raw: &RawStatus) -> Interpretation {
    match StatusPayload::classify(raw) {
        StatusPayload::Complete(stats) => Interpretation::Completed {
            event: ProgressEvent::new(100, "Processing complete!", JobPhase::Complete)
                .with_step(raw.current_step.clone()),
            stats,
        },
        StatusPayload::Failed { error } => {
            let detail = error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            Interpretation::Failed(
                ProgressEvent::failed(format!("Processing error: {detail}"), detail)
                    .with_step(Some("error".to_string())),
            )
        }
        StatusPayload::Canonical {
            percent,
            status_text,
            step,
        } => Interpretation::Progress(
            ProgressEvent::new(clamp_percent(percent), status_text, JobPhase::Processing)
                .with_step(step),
        ),
        StatusPayload::Legacy(step) => Interpretation::Progress(
            ProgressEvent::new(step.percent(), step.message(), JobPhase::Processing)
                .with_step(Some(step.keyword().to_string())),
        ),
        StatusPayload::Unrecognized { step } => Interpretation::Ignored { step },
    }
}

fn clamp_percent(percent: f64) -> u8 {
    if percent.is_nan() {
        return 0;
    }
    percent.clamp(0.0, 100.0).round() as u8
}

fn completion_stats(raw: &RawStatus) -> CompletionStats {
    let nested = raw.stats.clone().unwrap_or_default();
    CompletionStats {
        file_count: raw.file_count.or(nested.file_count),
        processing_time_secs: nested.processing_time_secs,
    }
}
