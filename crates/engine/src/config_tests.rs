// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

#[test]
fn defaults_match_the_documented_surface() {
    let config = EngineConfig::default();
    assert_eq!(config.fallback, FallbackPolicy::Error);
    assert_eq!(config.semantic_threshold, DEFAULT_SEMANTIC_THRESHOLD);
    assert!(!config.case_sensitive);
    assert_eq!(config.sequence_policy, SequencePolicy::Clamp);
    assert_eq!(config.sessions_dir, PathBuf::from(DEFAULT_SESSIONS_DIR));
}

#[test]
fn partial_toml_keeps_defaults_for_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("understudy.toml");
    std::fs::write(&path, "fallback = \"pass_through\"\n").unwrap();

    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config.fallback, FallbackPolicy::PassThrough);
    assert_eq!(config.semantic_threshold, DEFAULT_SEMANTIC_THRESHOLD);
}

#[test]
fn full_toml_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("understudy.toml");
    std::fs::write(
        &path,
        r#"
fallback = "default"
semantic_threshold = 0.5
case_sensitive = true
sequence_policy = "cycle"
sessions_dir = "custom/tapes"
"#,
    )
    .unwrap();

    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config.fallback, FallbackPolicy::Default);
    assert_eq!(config.semantic_threshold, 0.5);
    assert!(config.case_sensitive);
    assert_eq!(config.sequence_policy, SequencePolicy::Cycle);
    assert_eq!(config.sessions_dir, PathBuf::from("custom/tapes"));
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("understudy.toml");
    std::fs::write(&path, "fallbck = \"error\"\n").unwrap();

    let err = EngineConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn out_of_range_threshold_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("understudy.toml");
    std::fs::write(&path, "semantic_threshold = 1.5\n").unwrap();

    let err = EngineConfig::load(&path).unwrap_err();
    match err {
        ConfigError::Validation(message) => assert!(message.contains("1.5")),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = EngineConfig::load(Path::new("/nonexistent/understudy.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn rooted_prefixes_the_sessions_dir() {
    let config = EngineConfig::rooted(Path::new("/tmp/project"));
    assert_eq!(
        config.sessions_dir,
        PathBuf::from("/tmp/project/.understudy/sessions")
    );
    assert_eq!(config.fallback, FallbackPolicy::Error);
}

#[test]
fn builder_style_setters_replace_fields() {
    let config = EngineConfig::default()
        .with_fallback(FallbackPolicy::Default)
        .with_sessions_dir("elsewhere");
    assert_eq!(config.fallback, FallbackPolicy::Default);
    assert_eq!(config.sessions_dir, PathBuf::from("elsewhere"));
}
