//! Tests for ConvertBuilder validation and resolution order.

use std::fs;

use crate::builder::{ConvertBuilder, ResolvedKinds};
use crate::error::{ConfigError, ConvertError, Stage};
use crate::format::{FormatKind, FormatRegistry};

#[test]
fn validation_reports_first_gap_in_order() {
    let err = ConvertBuilder::default().validate().unwrap_err();
    assert_eq!(err, ConfigError::MissingSource);

    let err = ConvertBuilder::default().source("data.txt").validate().unwrap_err();
    assert_eq!(err, ConfigError::MissingSourceType);

    let err = ConvertBuilder::default().source("data.csv").validate().unwrap_err();
    assert_eq!(err, ConfigError::MissingTarget);

    let err = ConvertBuilder::default()
        .source("data.csv")
        .target("-")
        .validate()
        .unwrap_err();
    assert_eq!(err, ConfigError::MissingTargetType);
}

#[test]
fn stdin_requires_explicit_type() {
    let err = ConvertBuilder::default()
        .source("-")
        .target("out.json")
        .validate()
        .unwrap_err();
    assert_eq!(err, ConfigError::MissingSourceType);

    let kinds = ConvertBuilder::default()
        .source("-")
        .source_type(FormatKind::Csv)
        .target("out.json")
        .validate()
        .unwrap();
    assert_eq!(
        kinds,
        ResolvedKinds {
            source: FormatKind::Csv,
            target: FormatKind::Json
        }
    );
}

#[test]
fn explicit_type_beats_detection() {
    let kinds = ConvertBuilder::default()
        .source("data.json")
        .source_type(FormatKind::Pipe)
        .target("out.csv")
        .validate()
        .unwrap();
    assert_eq!(kinds.source, FormatKind::Pipe);
    assert_eq!(kinds.target, FormatKind::Csv);
}

#[test]
fn unregistered_kind_is_unknown() {
    let registry = FormatRegistry::new().with_format(FormatKind::Json);
    let err = ConvertBuilder::new(registry)
        .source("a.json")
        .target("b.json")
        .target_type(FormatKind::Jbin)
        .validate()
        .unwrap_err();
    assert_eq!(err, ConfigError::UnknownTargetType("jbin".into()));
}

#[test]
fn incomplete_build_performs_no_io() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("out.unknown");

    let err = ConvertBuilder::default()
        .source("-")
        .source_type(FormatKind::Json)
        .target(target.to_str().unwrap())
        .build()
        .unwrap_err();

    assert!(matches!(err, ConvertError::Config(ConfigError::MissingTargetType)));
    assert!(!dir.path().join("nested").exists());
}

#[test]
fn bad_delimiter_fails_before_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    fs::write(&input, "a\n1\n").unwrap();
    let target = dir.path().join("nested").join("out.txt");

    let err = ConvertBuilder::default()
        .source(input.to_str().unwrap())
        .target(target.to_str().unwrap())
        .target_type(FormatKind::Delimited)
        .target_delimiter('é')
        .build()
        .unwrap_err();

    assert!(matches!(err, ConvertError::Config(ConfigError::InvalidDelimiter(_))));
    assert_eq!(err.exit_code(), 255);
    assert!(!dir.path().join("nested").exists());
}

#[test]
fn missing_source_fails_before_target_is_resolved() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("out.json");

    let err = ConvertBuilder::default()
        .source(dir.path().join("missing.csv").to_str().unwrap())
        .target(target.to_str().unwrap())
        .build()
        .unwrap_err();

    match err {
        ConvertError::Io(e) => assert_eq!(e.stage, Stage::ResolveSource),
        other => panic!("expected resolution error, got: {other:?}"),
    }
    assert!(!dir.path().join("nested").exists());
}

#[test]
fn build_creates_target_directories_but_not_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    fs::write(&input, "a\n1\n").unwrap();
    let target = dir.path().join("nested").join("out.json");

    let engine = ConvertBuilder::default()
        .source(input.to_str().unwrap())
        .target(target.to_str().unwrap())
        .build()
        .unwrap();

    assert!(dir.path().join("nested").is_dir());
    assert!(!target.exists());
    assert_eq!(engine.decoder().kind(), FormatKind::Csv);
    assert_eq!(engine.encoder().kind(), FormatKind::Json);
}
