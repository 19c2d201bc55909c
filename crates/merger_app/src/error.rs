use std::io;
use std::path::PathBuf;

use merger_engine::{EngineError, PersistError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("cannot serialize config: {0}")]
    ConfigSerialize(#[from] ron::Error),
    #[error("config path {0:?} has no file name")]
    ConfigPath(PathBuf),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("terminal output failed: {0}")]
    Io(#[from] io::Error),
}
