// A directory planted at the final name after start() makes the rename step
// fail regardless of privileges, which exercises the commit failure path
// without depending on permission checks (those do not apply when the test
// suite runs as root).

use std::fs;
use std::io::Write;

use stagefile::{CommitStep, Durability, Stage, StageError};
use tempfile::tempdir;

#[test]
fn rename_failure_leaves_staging_file_for_cleanup() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("table.idx");

    let mut stage = Stage::start(&target).unwrap();
    stage.write_all(b"v2").unwrap();
    let temp = stage.temp_path().unwrap().to_path_buf();

    fs::create_dir(&target).unwrap();

    let err = stage.finish(Durability::Data).unwrap_err();
    assert!(
        matches!(
            err.error,
            StageError::Commit {
                step: CommitStep::Rename,
                ..
            }
        ),
        "got {:?}",
        err.error
    );

    // The staging file survives the failed commit, unmodified.
    assert!(temp.exists());
    assert_eq!(fs::read(&temp).unwrap(), b"v2");

    err.stage.cleanup();
    assert!(!temp.exists());
}

#[test]
fn second_finish_after_failed_rename_reports_closed() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("table.idx");

    let mut stage = Stage::start(&target).unwrap();
    stage.write_all(b"v2").unwrap();
    fs::create_dir(&target).unwrap();

    let err = stage.finish(Durability::Data).unwrap_err();
    let mut stage = err.stage;

    // The descriptor is gone; writes and a second finish are usage errors.
    assert!(stage.write_all(b"more").is_err());
    let err2 = stage.finish(Durability::Data).unwrap_err();
    assert!(matches!(err2.error, StageError::Closed(_)), "got {:?}", err2.error);

    // Rollback still works from this state.
    let temp = err2.stage.temp_path().unwrap().to_path_buf();
    err2.stage.cleanup();
    assert!(!temp.exists());
}
