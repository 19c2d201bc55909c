//! Pure projection of the controller state into what the UI shows.
//!
//! `AppState::view` rebuilds the whole model on every call, so projecting the
//! same state twice always yields equal models and never accumulates actions.

use crate::{AppState, ArtifactKind, CompletionStats, JobPhase, Notice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressStyle {
    /// Striped, animated bar while work is running.
    #[default]
    Active,
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressView {
    pub visible: bool,
    pub percent: u8,
    pub message: String,
    pub style: ProgressStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultCardView {
    pub visible: bool,
    pub stats: Option<CompletionStats>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAction {
    pub artifact: ArtifactKind,
    pub label: String,
    /// Server path the artifact is fetched from.
    pub href: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionsView {
    pub can_submit: bool,
    pub can_cancel: bool,
    pub can_reset: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: JobPhase,
    pub file_name: Option<String>,
    pub progress: ProgressView,
    pub result_card: ResultCardView,
    pub downloads: Vec<DownloadAction>,
    pub actions: ActionsView,
    pub notice: Option<Notice>,
}

impl AppState {
    pub fn view(&self) -> AppViewModel {
        let phase = self.phase();
        let complete = phase == JobPhase::Complete;

        let progress = match self.progress() {
            Some(event) if phase != JobPhase::Idle => ProgressView {
                visible: true,
                percent: event.percent(),
                message: event.message().to_string(),
                style: match phase {
                    JobPhase::Complete => ProgressStyle::Success,
                    JobPhase::Error => ProgressStyle::Danger,
                    _ => ProgressStyle::Active,
                },
            },
            _ => ProgressView::default(),
        };

        let downloads = ArtifactKind::ALL
            .iter()
            .map(|&artifact| DownloadAction {
                artifact,
                label: format!("Download {}", artifact.label()),
                href: format!("/download/{}", artifact.as_str()),
                enabled: complete,
            })
            .collect();

        AppViewModel {
            phase,
            file_name: self.file_name().map(ToOwned::to_owned),
            progress,
            result_card: ResultCardView {
                visible: complete,
                stats: if complete {
                    self.completion_stats().cloned()
                } else {
                    None
                },
            },
            downloads,
            actions: ActionsView {
                can_submit: phase == JobPhase::Idle,
                can_cancel: phase.is_busy(),
                can_reset: phase.is_terminal(),
            },
            notice: self.notice().cloned(),
        }
    }
}
