use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;

use mirrorwatch::config::{load_and_validate, load_optional, ConfigFile, Invocation, Settings};
use mirrorwatch::errors::MirrorwatchError;
use mirrorwatch::types::LineEnding;
use mirrorwatch_test_utils::builders::Workspace;

fn invocation(ws: &Workspace, dest: PathBuf, pattern: &str) -> Invocation {
    Invocation {
        source: ws.src(),
        destination: dest,
        pattern: pattern.to_string(),
    }
}

#[test]
fn demo_config_loads() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest_dir.join("demos/mirrorwatch.toml")).unwrap();

    assert_eq!(cfg.poll_interval(), Duration::from_millis(500));
    assert!(cfg.watch.use_notifier);
    assert_eq!(cfg.publish.line_ending, LineEnding::Lf);
}

#[test]
fn missing_sections_use_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[publish]\nline_ending = \"crlf\"\n").unwrap();

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.poll_interval(), Duration::from_secs(1));
    assert_eq!(cfg.publish.line_ending, LineEnding::Crlf);
}

#[test]
fn no_config_path_means_defaults() {
    let cfg = load_optional(None).unwrap();
    assert_eq!(cfg.poll_interval(), Duration::from_secs(1));
    assert_eq!(cfg.publish.line_ending, LineEnding::Native);
}

#[test]
fn zero_poll_interval_returns_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[watch]\npoll_interval_ms = 0\n").unwrap();

    match load_and_validate(file.path()) {
        Err(MirrorwatchError::ConfigError(msg)) => assert!(msg.contains("poll_interval_ms")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn unknown_line_ending_is_a_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[publish]\nline_ending = \"cr\"\n").unwrap();

    assert!(matches!(
        load_and_validate(file.path()),
        Err(MirrorwatchError::TomlError(_))
    ));
}

#[test]
fn missing_config_file_reports_its_path() {
    let err = load_and_validate("/no/such/mirrorwatch.toml").unwrap_err();
    match err {
        MirrorwatchError::PathIo { path, .. } => {
            assert_eq!(path, PathBuf::from("/no/such/mirrorwatch.toml"))
        }
        other => panic!("expected PathIo, got {other:?}"),
    }
}

#[test]
fn settings_resolve_paths_and_pattern() {
    let ws = Workspace::new();
    let cfg = ConfigFile::default();

    let settings = Settings::resolve(invocation(&ws, ws.dist(), r".*\.md"), &cfg).unwrap();

    assert_eq!(settings.source, ws.src().canonicalize().unwrap());
    assert!(settings.destination.is_absolute());
    assert!(settings.destination.ends_with("dist"));
    assert!(settings.pattern.matches_name("a.md"));
    assert!(settings.use_notifier);

    let job = settings.publish_job();
    assert_eq!(job.source, settings.source);
    assert_eq!(job.line_ending, LineEnding::Native);
}

#[test]
fn missing_source_is_rejected() {
    let ws = Workspace::new();
    fs::remove_dir_all(ws.src()).unwrap();

    let err = Settings::resolve(invocation(&ws, ws.dist(), ".*"), &ConfigFile::default())
        .unwrap_err();
    assert!(matches!(err, MirrorwatchError::SourceNotFound(_)));
}

#[test]
fn source_that_is_a_file_is_rejected() {
    let ws = Workspace::new();
    let file = ws.root().join("plain.txt");
    fs::write(&file, "x").unwrap();

    let inv = Invocation {
        source: file,
        destination: ws.dist(),
        pattern: ".*".to_string(),
    };
    let err = Settings::resolve(inv, &ConfigFile::default()).unwrap_err();
    assert!(matches!(err, MirrorwatchError::SourceNotFound(_)));
}

#[test]
fn invalid_pattern_is_rejected() {
    let ws = Workspace::new();
    let err = Settings::resolve(invocation(&ws, ws.dist(), "[unterminated"), &ConfigFile::default())
        .unwrap_err();
    assert!(matches!(err, MirrorwatchError::InvalidPattern { .. }));
}

#[test]
fn destination_inside_source_is_rejected() {
    let ws = Workspace::new();
    let nested = ws.src().join("out");

    let err = Settings::resolve(invocation(&ws, nested, ".*"), &ConfigFile::default()).unwrap_err();
    assert!(matches!(err, MirrorwatchError::ConfigError(_)));
}

#[test]
fn destination_containing_source_is_rejected() {
    let ws = Workspace::new();
    let parent = ws.root().to_path_buf();

    let err = Settings::resolve(invocation(&ws, parent, ".*"), &ConfigFile::default()).unwrap_err();
    assert!(matches!(err, MirrorwatchError::ConfigError(_)));
}

#[test]
fn dot_dot_destination_outside_source_is_accepted() {
    let ws = Workspace::new();
    let dest = ws.src().join("..").join("public");

    let settings = Settings::resolve(invocation(&ws, dest, ".*"), &ConfigFile::default()).unwrap();
    assert!(settings.destination.ends_with("public"));
    assert!(!settings.destination.starts_with(&settings.source));
}
