use std::path::Path;
use std::time::Duration;

/// Tunables for the job controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Delay between two status polls while a job is processing.
    pub poll_interval: Duration,
    /// Consecutive failed polls tolerated before the job is failed with a timeout.
    /// Zero disables the ceiling.
    pub max_consecutive_poll_failures: u32,
    /// Consecutive "status not ready" polls tolerated before the job is failed with a timeout.
    /// Zero disables the ceiling.
    pub max_pending_polls: u32,
    /// Accepted archive extension, without the leading dot.
    pub accepted_extension: String,
    /// Accepted archive MIME type.
    pub accepted_mime: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            max_consecutive_poll_failures: 5,
            max_pending_polls: 150,
            accepted_extension: "zip".to_string(),
            accepted_mime: "application/zip".to_string(),
        }
    }
}

impl ControllerConfig {
    /// A file is accepted when either its declared MIME type or its extension matches.
    pub fn accepts(&self, file_name: &str, content_type: Option<&str>) -> bool {
        if content_type.is_some_and(|ct| ct.trim().eq_ignore_ascii_case(&self.accepted_mime)) {
            return true;
        }
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.accepted_extension))
    }
}
