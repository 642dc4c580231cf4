//! Unit tests for domain error types

use langserver_domain::Error;

#[test]
fn test_invalid_mode_error_quotes_value() {
    let error = Error::invalid_mode("websocket");
    assert_eq!(error.to_string(), r#"invalid mode "websocket""#);
    assert!(error.is_configuration());
}

#[test]
fn test_conflicting_flags_error() {
    let error = Error::conflicting_flags("verbose", "quiet");
    match &error {
        Error::ConflictingFlags { first, second } => {
            assert_eq!(*first, "verbose");
            assert_eq!(*second, "quiet");
        }
        _ => panic!("Expected ConflictingFlags error"),
    }
    assert!(error.to_string().contains("mutually exclusive"));
}

#[test]
fn test_bind_error_is_not_configuration() {
    let source = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
    let error = Error::bind("127.0.0.1:2088", source);
    assert!(!error.is_configuration());
    assert!(error.to_string().contains("127.0.0.1:2088"));
}

#[test]
fn test_log_file_error_names_path() {
    let source = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
    let error = Error::log_file("/missing/dir/server.log", source);
    let display = error.to_string();
    assert!(display.contains("/missing/dir/server.log"));
    assert!(display.contains("no such directory"));
}

#[test]
fn test_config_with_source_keeps_source() {
    let source = std::io::Error::other("boom");
    let error = Error::config_with_source("failed to read", source);
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
    let error: Error = io.into();
    assert!(matches!(error, Error::IoSimple { .. }));
}
