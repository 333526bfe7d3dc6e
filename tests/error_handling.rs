//! Failure taxonomy and cleanup guarantees: every failure is typed, carries
//! context, and leaves no staged file behind.
use std::fs;
use std::path::Path;

use intake::{ingest, ErrorKind, HashAlgorithm, IntakeConfig, IntakeError};

fn cfg_in(dir: &Path) -> IntakeConfig {
    IntakeConfig {
        temp_dir: Some(dir.to_path_buf()),
        ..Default::default()
    }
}

fn staged_count(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[test]
fn empty_input_is_rejected() {
    let staging = tempfile::tempdir().expect("tempdir");
    let err = ingest("   ", &cfg_in(staging.path())).unwrap_err();
    assert_eq!(err, IntakeError::EmptyInput);
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(staged_count(staging.path()), 0);
}

#[test]
fn data_uri_without_comma_is_malformed() {
    let staging = tempfile::tempdir().expect("tempdir");
    let err = ingest("data:text/plain;base64", &cfg_in(staging.path())).unwrap_err();
    assert!(matches!(err, IntakeError::InvalidRfc2397Encoding { .. }));
    assert_eq!(staged_count(staging.path()), 0);
}

#[test]
fn invalid_base64_payload_is_typed() {
    let staging = tempfile::tempdir().expect("tempdir");
    let err = ingest("data:;base64,@@@not-base64@@@", &cfg_in(staging.path())).unwrap_err();
    assert!(matches!(err, IntakeError::InvalidBase64Encoding { .. }));
    assert!(err.is_client_error());
    assert_eq!(staged_count(staging.path()), 0);
}

#[test]
fn scenario_garbage_input_has_no_side_effects() {
    let staging = tempfile::tempdir().expect("tempdir");
    let err = ingest("not-a-valid-uri-or-path", &cfg_in(staging.path())).unwrap_err();
    assert_eq!(err, IntakeError::InvalidDataProvided);
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(staged_count(staging.path()), 0);
}

#[test]
fn scenario_unknown_hash_algorithm_rejected_before_io() {
    let err = HashAlgorithm::from_name("not-a-real-algo").unwrap_err();
    assert!(matches!(
        err,
        IntakeError::UnsupportedHashAlgorithm { ref name } if name == "not-a-real-algo"
    ));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn missing_file_with_path_shape_is_a_path_failure() {
    let staging = tempfile::tempdir().expect("tempdir");
    let err = ingest("/definitely/not/here.bin", &cfg_in(staging.path())).unwrap_err();
    assert!(matches!(err, IntakeError::InvalidFilePath { .. }));
    assert_eq!(staged_count(staging.path()), 0);
}

#[test]
fn directory_input_is_a_path_failure() {
    let staging = tempfile::tempdir().expect("tempdir");
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ingest(dir.path().to_str().unwrap(), &cfg_in(staging.path())).unwrap_err();
    assert!(matches!(
        err,
        IntakeError::InvalidFilePath { ref reason, .. } if reason == "is a directory"
    ));
}

#[test]
fn overlong_path_is_rejected() {
    let staging = tempfile::tempdir().expect("tempdir");
    let long = format!("/tmp/{}", "x".repeat(8192));
    let err = ingest(&long, &cfg_in(staging.path())).unwrap_err();
    assert!(matches!(err, IntakeError::PathTooLong { .. }));
}

#[test]
fn missing_staging_directory_fails_before_any_write() {
    let cfg = IntakeConfig {
        temp_dir: Some("/no/such/staging/dir".into()),
        ..Default::default()
    };
    let err = ingest("data:,Test", &cfg).unwrap_err();
    assert!(matches!(err, IntakeError::TempDirectoryNotWritable { .. }));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn empty_display_name_override_is_a_configuration_error() {
    let staging = tempfile::tempdir().expect("tempdir");
    let cfg = IntakeConfig {
        temp_dir: Some(staging.path().to_path_buf()),
        display_name: Some("  ".into()),
        ..Default::default()
    };
    let err = ingest("data:,Test", &cfg).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(staged_count(staging.path()), 0);
}

#[test]
fn error_messages_name_the_offender() {
    let staging = tempfile::tempdir().expect("tempdir");
    let err = ingest("/definitely/not/here.bin", &cfg_in(staging.path())).unwrap_err();
    assert!(err.to_string().contains("here.bin"));

    let err = HashAlgorithm::from_name("md5-but-wrong").unwrap_err();
    assert!(err.to_string().contains("md5-but-wrong"));
}

#[test]
fn successful_run_leaves_exactly_one_staged_file() {
    let staging = tempfile::tempdir().expect("tempdir");
    let cfg = IntakeConfig {
        temp_dir: Some(staging.path().to_path_buf()),
        auto_delete_staged: false,
        ..Default::default()
    };
    let artifact = ingest("data:,Test", &cfg).expect("ingest");
    assert_eq!(staged_count(staging.path()), 1);
    drop(artifact);
    assert_eq!(staged_count(staging.path()), 1);
}

#[test]
fn failures_after_resolution_leave_no_staged_files() {
    // Exhaust the resolvable-but-unstageable shapes we can fabricate: a
    // source file that disappears between resolution and staging is not
    // reproducible deterministically, so cover the contract through the
    // public surface we can drive: every error path observed here must
    // leave the staging directory empty.
    let staging = tempfile::tempdir().expect("tempdir");
    let cfg = cfg_in(staging.path());
    let inputs = [
        "",
        "data:;base64,%%%",
        "data:nocomma",
        "/missing/source.png",
        "garbage-token",
    ];
    for input in inputs {
        let _ = ingest(input, &cfg).unwrap_err();
        assert_eq!(staged_count(staging.path()), 0, "leak for input {input:?}");
    }
}

#[test]
fn read_failure_after_external_deletion_is_typed() {
    let staging = tempfile::tempdir().expect("tempdir");
    let artifact = ingest("data:,Test", &cfg_in(staging.path())).expect("ingest");
    fs::remove_file(artifact.path()).unwrap();

    let err = artifact.read().unwrap_err();
    assert!(matches!(err, IntakeError::ReadingFileFailed { .. }));
    assert_eq!(err.kind(), ErrorKind::Read);

    let err = artifact.to_data_uri().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Read);
}
