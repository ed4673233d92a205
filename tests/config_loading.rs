// tests/config_loading.rs

use std::fs;

use clipwatch::config::{load_and_validate, load_from_path, validate_config, ConfigFile};

#[test]
fn empty_config_gets_all_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Clipwatch.toml");
    fs::write(&path, "").unwrap();

    let cfg = load_and_validate(&path).unwrap();
    assert_eq!(cfg.engine.primary_cadence_ms, 100);
    assert_eq!(cfg.engine.secondary_cadence_ms, 50);
    assert_eq!(cfg.engine.background_secondary_cadence_ms, 25);
    assert_eq!(cfg.engine.debounce_window_ms, 500);
    assert_eq!(cfg.engine.background_debounce_window_ms, 100);
    assert_eq!(cfg.engine.republish_delay_ms, 50);
    assert_eq!(cfg.engine.tracker_cadence_ms, 1000);
}

#[test]
fn partial_engine_section_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Clipwatch.toml");
    fs::write(
        &path,
        r#"
[engine]
debounce_window_ms = 750
background_debounce_window_ms = 200
"#,
    )
    .unwrap();

    let cfg = load_and_validate(&path).unwrap();
    assert_eq!(cfg.engine.debounce_window_ms, 750);
    assert_eq!(cfg.engine.background_debounce_window_ms, 200);
    assert_eq!(cfg.engine.primary_cadence_ms, 100);
}

#[test]
fn zero_cadence_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Clipwatch.toml");
    fs::write(
        &path,
        r#"
[engine]
primary_cadence_ms = 0
"#,
    )
    .unwrap();

    let err = load_and_validate(&path).unwrap_err();
    assert!(err.to_string().contains("primary_cadence_ms"));
}

#[test]
fn inverted_background_values_pass_validation() {
    // Inverted background values are legal (only warned about).
    let mut cfg = ConfigFile::default();
    cfg.engine.background_debounce_window_ms = 1000;
    cfg.engine.debounce_window_ms = 100;
    validate_config(&cfg).unwrap();
}

#[test]
fn malformed_toml_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Clipwatch.toml");
    fs::write(&path, "[engine\nnope").unwrap();

    assert!(load_from_path(&path).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_from_path(dir.path().join("absent.toml")).is_err());
}
