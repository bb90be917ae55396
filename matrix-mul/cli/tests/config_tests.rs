use matrix_mul::config::{Backend, Config, MAX_SIZE};
use matrix_mul::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================
// Loading
// ============================================================

#[test]
fn test_defaults_without_file() {
    let config = Config::load_or_default(None).unwrap();

    assert_eq!(config.size, 8);
    assert_eq!(config.backend, Backend::Tasks);
    assert_eq!(config.deadline(), None);
    assert_eq!(config.log_filter, "warn");
    assert!(config.validate().is_ok());
}

#[test]
fn test_file_fields_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"size": 3, "backend": "processes", "deadline_ms": 250, "worker_program": "/opt/row-worker"}"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.size, 3);
    assert_eq!(config.backend, Backend::Processes);
    assert_eq!(config.deadline(), Some(Duration::from_millis(250)));
    assert_eq!(
        config.worker_program().unwrap(),
        PathBuf::from("/opt/row-worker")
    );
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = Config::load(&dir.path().join("absent.json")).unwrap_err();

    assert!(matches!(err, Error::ConfigRead { .. }));
}

// ============================================================
// Validation
// ============================================================

#[test]
fn test_size_must_be_positive_and_bounded() {
    let mut config = Config::default();

    config.size = MAX_SIZE;
    assert!(config.validate().is_ok());

    for size in [0, MAX_SIZE + 1, usize::MAX] {
        config.size = size;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidSize { size: s, max: MAX_SIZE }) if s == size
        ));
    }
}
