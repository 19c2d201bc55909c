//! Out-of-band triggers (keyboard shortcuts, typed commands) and how they map
//! onto controller commands. Nothing here performs I/O; every trigger goes
//! through the same phase checks as the regular commands.

use std::fmt;

use engine_logging::engine_debug;

use crate::{AppState, Effect, JobPhase, Notice, NoticeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArtifactKind {
    Docx,
    Pdf,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Docx, ArtifactKind::Pdf];

    /// Path segment used by `GET /download/{artifact}`.
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Docx => "docx",
            ArtifactKind::Pdf => "pdf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Docx => "DOCX",
            ArtifactKind::Pdf => "PDF",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Docx => "merged.docx",
            ArtifactKind::Pdf => "merged.pdf",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    OpenFilePicker,
    /// Download the merged DOCX.
    DownloadPrimary,
    /// Download the merged PDF.
    DownloadSecondary,
    Reset,
    CancelInFlight,
    ShowHelp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyChord {
    Ctrl(char),
    Escape,
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyChord::Ctrl(key) => write!(f, "Ctrl+{}", key.to_ascii_uppercase()),
            KeyChord::Escape => f.write_str("Escape"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub chord: KeyChord,
    pub word: &'static str,
    pub trigger: Trigger,
    pub description: &'static str,
}

/// Help table, in display order.
pub const SHORTCUTS: [Shortcut; 6] = [
    Shortcut {
        chord: KeyChord::Ctrl('o'),
        word: "open",
        trigger: Trigger::OpenFilePicker,
        description: "Choose a ZIP archive to upload",
    },
    Shortcut {
        chord: KeyChord::Ctrl('d'),
        word: "docx",
        trigger: Trigger::DownloadPrimary,
        description: "Download the merged document (DOCX)",
    },
    Shortcut {
        chord: KeyChord::Ctrl('p'),
        word: "pdf",
        trigger: Trigger::DownloadSecondary,
        description: "Download the merged document (PDF)",
    },
    Shortcut {
        chord: KeyChord::Ctrl('r'),
        word: "reset",
        trigger: Trigger::Reset,
        description: "Reset after processing",
    },
    Shortcut {
        chord: KeyChord::Ctrl('h'),
        word: "help",
        trigger: Trigger::ShowHelp,
        description: "Show the shortcut help",
    },
    Shortcut {
        chord: KeyChord::Escape,
        word: "cancel",
        trigger: Trigger::CancelInFlight,
        description: "Cancel the running operation",
    },
];

pub fn key_to_trigger(chord: KeyChord) -> Option<Trigger> {
    let chord = match chord {
        KeyChord::Ctrl(key) => KeyChord::Ctrl(key.to_ascii_lowercase()),
        other => other,
    };
    SHORTCUTS
        .iter()
        .find(|shortcut| shortcut.chord == chord)
        .map(|shortcut| shortcut.trigger)
}

pub fn word_to_trigger(word: &str) -> Option<Trigger> {
    let word = word.trim();
    SHORTCUTS
        .iter()
        .find(|shortcut| shortcut.word.eq_ignore_ascii_case(word))
        .map(|shortcut| shortcut.trigger)
}

pub(crate) fn handle_trigger(state: &mut AppState, trigger: Trigger) -> Vec<Effect> {
    let phase = state.phase();
    match trigger {
        Trigger::OpenFilePicker => vec![Effect::OpenFilePicker],
        Trigger::ShowHelp => vec![Effect::ShowHelp],
        Trigger::DownloadPrimary => request_download(state, ArtifactKind::Docx),
        Trigger::DownloadSecondary => request_download(state, ArtifactKind::Pdf),
        Trigger::Reset => crate::update::reset(state),
        Trigger::CancelInFlight if phase.is_busy() => vec![Effect::ConfirmCancel],
        Trigger::CancelInFlight => {
            engine_debug!("Cancel ignored in phase {:?}", phase);
            Vec::new()
        }
    }
}

fn request_download(state: &mut AppState, artifact: ArtifactKind) -> Vec<Effect> {
    if state.phase() == JobPhase::Complete {
        vec![Effect::Download { artifact }]
    } else {
        state.set_notice(Notice::warning(
            NoticeKind::Unavailable,
            format!("The {} file is not available yet.", artifact.label()),
        ));
        Vec::new()
    }
}
