//! `merger` client: drives the job controller from a line-based terminal UI.
pub mod app;
pub mod cli;
pub mod config;
pub mod effects;
pub mod error;
pub mod input;
pub mod logging;
pub mod ui;

pub use app::{run, App, Flow};
pub use cli::Args;
pub use config::ClientConfig;
pub use error::CliError;
