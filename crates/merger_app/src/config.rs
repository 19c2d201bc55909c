//! Client configuration: RON file, then command-line overrides.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::engine_info;
use merger_core::ControllerConfig;
use merger_engine::{AtomicFileWriter, TransportSettings};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::error::CliError;
use crate::logging::LogDestination;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub max_poll_failures: u32,
    /// Not-ready polls tolerated before giving up; 0 waits forever.
    pub max_pending_polls: u32,
    pub output_dir: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub upload_timeout_secs: u64,
    pub max_download_mb: u64,
    pub log: LogDestination,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let controller = ControllerConfig::default();
        let transport = TransportSettings::default();
        Self {
            server_url: transport.base_url,
            poll_interval_ms: controller.poll_interval.as_millis() as u64,
            max_poll_failures: controller.max_consecutive_poll_failures,
            max_pending_polls: controller.max_pending_polls,
            output_dir: PathBuf::from("merged"),
            connect_timeout_secs: transport.connect_timeout.as_secs(),
            request_timeout_secs: transport.request_timeout.as_secs(),
            upload_timeout_secs: transport.upload_timeout.as_secs(),
            max_download_mb: transport.max_download_bytes / (1024 * 1024),
            log: LogDestination::default(),
        }
    }
}

impl ClientConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                engine_info!("No config at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CliError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<PathBuf, CliError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| CliError::ConfigPath(path.to_path_buf()))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?;
        let written = AtomicFileWriter::new(dir).write(file_name, content.as_bytes())?;
        engine_info!("Wrote config to {:?}", written);
        Ok(written)
    }

    pub fn apply_overrides(&mut self, args: &Args) {
        if let Some(server) = &args.server {
            self.server_url = server.clone();
        }
        if let Some(interval) = args.poll_interval_ms {
            self.poll_interval_ms = interval;
        }
        if let Some(failures) = args.max_poll_failures {
            self.max_poll_failures = failures;
        }
        if let Some(dir) = &args.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(log) = args.log {
            self.log = log;
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            max_consecutive_poll_failures: self.max_poll_failures,
            max_pending_polls: self.max_pending_polls,
            ..ControllerConfig::default()
        }
    }

    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings {
            base_url: self.server_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            upload_timeout: Duration::from_secs(self.upload_timeout_secs),
            max_download_bytes: self.max_download_mb.saturating_mul(1024 * 1024),
        }
    }
}
