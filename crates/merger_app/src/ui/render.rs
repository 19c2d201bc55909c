use std::fmt::Write as _;
use std::io::{self, Write};

use merger_core::{AppViewModel, JobPhase, ProgressStyle, Severity, SHORTCUTS};

const BAR_WIDTH: usize = 30;

/// Prints a frame only when it differs from the last one printed.
#[derive(Debug, Default)]
pub struct Renderer {
    last_frame: Option<String>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether anything was written.
    pub fn draw<W: Write>(&mut self, view: &AppViewModel, out: &mut W) -> io::Result<bool> {
        let frame = render(view);
        if self.last_frame.as_deref() == Some(frame.as_str()) {
            return Ok(false);
        }
        out.write_all(frame.as_bytes())?;
        out.flush()?;
        self.last_frame = Some(frame);
        Ok(true)
    }
}

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    let phase = phase_label(view.phase);
    match &view.file_name {
        Some(name) => {
            let _ = writeln!(out, "== {phase} | {name}");
        }
        None => {
            let _ = writeln!(out, "== {phase}");
        }
    }

    if view.progress.visible {
        let filled = BAR_WIDTH * usize::from(view.progress.percent.min(100)) / 100;
        let fill = match view.progress.style {
            ProgressStyle::Active => '#',
            ProgressStyle::Success => '=',
            ProgressStyle::Danger => 'x',
        };
        let bar: String = std::iter::repeat(fill)
            .take(filled)
            .chain(std::iter::repeat('-').take(BAR_WIDTH - filled))
            .collect();
        let _ = writeln!(
            out,
            "[{bar}] {:>3}% {}",
            view.progress.percent, view.progress.message
        );
    }

    if view.result_card.visible {
        let mut summary = String::from("Merge complete");
        if let Some(stats) = &view.result_card.stats {
            if let Some(count) = stats.file_count {
                let _ = write!(summary, ": {count} files");
            }
            if let Some(secs) = stats.processing_time_secs {
                let _ = write!(summary, " in {secs} s");
            }
        }
        let _ = writeln!(out, "{summary}");
    }

    let downloads: Vec<String> = view
        .downloads
        .iter()
        .filter(|action| action.enabled)
        .map(|action| format!("{} ({})", action.artifact.label(), action.artifact))
        .collect();
    if !downloads.is_empty() {
        let _ = writeln!(out, "Downloads: {}", downloads.join(", "));
    }

    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "{} {}", severity_tag(notice.severity), notice.text);
    }

    let _ = writeln!(out, "{}", action_hint(view));
    out
}

pub fn help_text() -> String {
    let mut out = String::from("Shortcuts (type the word or the key chord):\n");
    for shortcut in SHORTCUTS {
        let _ = writeln!(
            out,
            "  {:<8} {:<8} {}",
            shortcut.chord.to_string(),
            shortcut.word,
            shortcut.description
        );
    }
    out.push_str("  upload <path>     Submit a ZIP archive\n");
    out.push_str("  dismiss           Close the current notice\n");
    out.push_str("  quit              Leave the program\n");
    out
}

fn action_hint(view: &AppViewModel) -> String {
    let mut hints = Vec::new();
    if view.actions.can_submit {
        hints.push("open");
    }
    if view.actions.can_cancel {
        hints.push("cancel");
    }
    if view.actions.can_reset {
        hints.push("reset");
    }
    hints.push("help");
    hints.push("quit");
    format!("> {}", hints.join(" | "))
}

fn phase_label(phase: JobPhase) -> &'static str {
    match phase {
        JobPhase::Idle => "Ready",
        JobPhase::Uploading => "Uploading",
        JobPhase::Processing => "Processing",
        JobPhase::Complete => "Complete",
        JobPhase::Error => "Error",
    }
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "[info]",
        Severity::Success => "[ok]",
        Severity::Warning => "[warn]",
        Severity::Danger => "[error]",
    }
}
