use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use merger_app::logging::LogDestination;
use merger_app::{Args, CliError, ClientConfig};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let config = ClientConfig::load(&temp.path().join("absent.ron")).unwrap();
    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.poll_interval_ms, 2000);
    assert_eq!(config.max_poll_failures, 5);
    assert_eq!(config.controller_config().poll_interval, Duration::from_secs(2));
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("merger.ron");
    fs::write(
        &path,
        r#"(server_url: "http://merge.local:8080/", poll_interval_ms: 500, log: Both)"#,
    )
    .unwrap();

    let config = ClientConfig::load(&path).unwrap();
    assert_eq!(config.server_url, "http://merge.local:8080/");
    assert_eq!(config.poll_interval_ms, 500);
    assert_eq!(config.log, LogDestination::Both);
    assert_eq!(config.max_pending_polls, ClientConfig::default().max_pending_polls);
    assert_eq!(
        config.transport_settings().base_url,
        "http://merge.local:8080/"
    );
}

#[test]
fn malformed_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("merger.ron");
    fs::write(&path, "(poll_interval_ms: \"fast\")").unwrap();

    let err = ClientConfig::load(&path).unwrap_err();
    assert!(matches!(err, CliError::ConfigParse { .. }), "{err}");
}

#[test]
fn command_line_overrides_file_values() {
    let args = Args::parse_from([
        "merger",
        "--server",
        "http://10.0.0.2:5000",
        "--poll-interval-ms",
        "250",
        "--max-poll-failures",
        "9",
        "--output-dir",
        "out",
        "--log",
        "off",
        "--exit-when-done",
        "docs.zip",
    ]);
    let mut config = ClientConfig::default();
    config.apply_overrides(&args);

    assert_eq!(args.archive, Some(PathBuf::from("docs.zip")));
    assert!(args.exit_when_done);
    assert_eq!(config.server_url, "http://10.0.0.2:5000");
    assert_eq!(config.poll_interval_ms, 250);
    assert_eq!(config.max_poll_failures, 9);
    assert_eq!(config.output_dir, PathBuf::from("out"));
    assert_eq!(config.log, LogDestination::Off);
    assert_eq!(config.controller_config().max_consecutive_poll_failures, 9);
}

#[test]
fn saved_config_loads_back() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("merger.ron");
    let config = ClientConfig {
        poll_interval_ms: 750,
        output_dir: PathBuf::from("downloads"),
        ..ClientConfig::default()
    };

    assert_eq!(config.save(&path).unwrap(), path);
    assert_eq!(ClientConfig::load(&path).unwrap(), config);
}
