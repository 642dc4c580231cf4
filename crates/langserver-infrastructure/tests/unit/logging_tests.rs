//! Tests for logging initialization

use langserver_domain::error::Error;
use langserver_domain::value_objects::{Configuration, Verbosity};
use langserver_infrastructure::logging::{LoggingSettings, build_writer, init_logging};

#[test]
fn test_settings_from_configuration() {
    let mut config = Configuration::stdio().with_log_file("/tmp/x.log");
    config.verbosity = Verbosity::Quiet;
    config.json_logs = true;

    let settings = LoggingSettings::from(&config);
    assert_eq!(settings.verbosity, Verbosity::Quiet);
    assert_eq!(settings.log_file.as_deref(), Some(std::path::Path::new("/tmp/x.log")));
    assert!(settings.json);
}

#[test]
fn test_console_only_writer() {
    let writer = build_writer(&LoggingSettings::default()).expect("console sink");
    assert_eq!(writer.sink_count(), 1);
}

#[test]
fn test_uncreatable_log_file_is_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("dir").join("server.log");
    let settings = LoggingSettings {
        log_file: Some(path.clone()),
        ..LoggingSettings::default()
    };

    let err = init_logging(&settings).expect_err("parent directory does not exist");
    match err {
        Error::LogFile { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn test_log_file_created_and_released_by_guard() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("server.log");
    std::fs::write(&path, "stale contents\n").expect("seed file");
    let settings = LoggingSettings {
        log_file: Some(path.clone()),
        ..LoggingSettings::default()
    };

    let guard = init_logging(&settings).expect("logging starts");
    let writer = guard.writer().expect("writer").clone();
    assert_eq!(writer.sink_count(), 2);

    writer.commit(b"written through the guard\n");
    drop(guard);
    assert_eq!(writer.sink_count(), 1);

    let contents = std::fs::read_to_string(&path).expect("log file");
    assert!(!contents.contains("stale contents"));
    assert!(contents.contains("written through the guard"));
}
