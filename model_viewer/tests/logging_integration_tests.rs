//! Integration tests for the logging system
//!
//! These tests replace the global logger, so they run serially.
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests


use backend_test_utils::{Node, RecordingBackend};
use model_viewer::mv::{Viewer, ViewerDesc};
use model_viewer::mv::log::{self, Logger, LogEntry, LogSeverity};
use model_viewer::mv::scene::{decode_scene, ComponentPatch};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn capture() -> Arc<Mutex<Vec<LogEntry>>> {
    let (test_logger, entries) = TestLogger::new();
    log::set_logger(test_logger);
    entries
}

// ============================================================================
// LOGGER CONTROL
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let entries = capture();

    log::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    log::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    log::log(LogSeverity::Error, "test::module", "Test error message".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(captured[0].severity, LogSeverity::Info);
        assert_eq!(captured[0].source, "test::module");
        assert_eq!(captured[0].message, "Test info message");
        assert_eq!(captured[1].severity, LogSeverity::Warn);
        assert_eq!(captured[2].severity, LogSeverity::Error);
        assert!(captured[2].file.is_none());
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_error_logging_with_location() {
    let entries = capture();

    log::log_detailed(
        LogSeverity::Error,
        "test::error",
        "Critical error occurred".to_string(),
        "test_file.rs",
        42,
    );

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].file, Some("test_file.rs"));
        assert_eq!(captured[0].line, Some(42));
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_min_severity_filter() {
    let entries = capture();

    // Default filter drops trace and debug
    log::log(LogSeverity::Trace, "test", "Trace message".to_string());
    log::log(LogSeverity::Debug, "test", "Debug message".to_string());
    log::log(LogSeverity::Info, "test", "Info message".to_string());

    log::set_min_severity(LogSeverity::Trace);
    log::log(LogSeverity::Trace, "test", "Trace message".to_string());

    log::set_min_severity(LogSeverity::Error);
    log::log(LogSeverity::Warn, "test", "Warn message".to_string());

    {
        let captured = entries.lock().unwrap();
        let severities: Vec<LogSeverity> = captured.iter().map(|entry| entry.severity).collect();
        assert_eq!(severities, vec![LogSeverity::Info, LogSeverity::Trace]);
    }

    log::reset_logger();
    assert_eq!(log::min_severity(), LogSeverity::Info);
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let entries = capture();

    log::log(LogSeverity::Info, "test", "Message 1".to_string());
    log::reset_logger();
    log::log(LogSeverity::Info, "test", "Message 2".to_string());

    assert_eq!(entries.lock().unwrap().len(), 1);
}

// ============================================================================
// LOGS EMITTED BY THE VIEWER
// ============================================================================

#[test]
#[serial]
fn test_integration_viewer_logs_creation() {
    let entries = capture();

    let tree = decode_scene(&Node::assembly("Root", vec![Node::part("Only", 0)]).encode()).unwrap();
    let _viewer = Viewer::new(ViewerDesc::new(tree, 1), RecordingBackend::new()).unwrap();

    {
        let captured = entries.lock().unwrap();
        assert!(captured
            .iter()
            .any(|entry| entry.severity == LogSeverity::Info && entry.source == "mv::Viewer"));
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_failed_patch_is_warned() {
    let tree = decode_scene(&Node::assembly("Root", vec![Node::part("Only", 0)]).encode()).unwrap();
    let mut viewer = Viewer::new(ViewerDesc::new(tree, 1), RecordingBackend::new()).unwrap();
    let entries = capture();

    viewer.apply_patches([("Nowhere", ComponentPatch::new().with_hidden(true))]);

    {
        let captured = entries.lock().unwrap();
        let warning = captured
            .iter()
            .find(|entry| entry.severity == LogSeverity::Warn)
            .unwrap();
        assert_eq!(warning.source, "mv::Patch");
        assert!(warning.message.contains("Nowhere"));
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_decode_error_logged_with_location() {
    let entries = capture();

    let bytes = Node::part("Cut", 0).encode();
    assert!(decode_scene(&bytes[..10]).is_err());

    {
        let captured = entries.lock().unwrap();
        let error = captured
            .iter()
            .find(|entry| entry.severity == LogSeverity::Error)
            .unwrap();
        assert_eq!(error.source, "mv::Decoder");
        assert!(error.file.is_some());
        assert!(error.line.is_some());
    }

    log::reset_logger();
}
