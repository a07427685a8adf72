use std::fs;
use std::io::Write;

use assert_fs::prelude::*;
use stagefile::Stage;

#[test]
fn explicit_cleanup_removes_staging_file() {
    let dir = assert_fs::TempDir::new().unwrap();
    let target = dir.child("table.idx");

    let mut stage = Stage::start(target.path()).unwrap();
    stage.write_all(b"half-written").unwrap();
    let temp = stage.temp_path().unwrap().to_path_buf();
    assert!(temp.exists());

    stage.cleanup();

    assert!(!temp.exists(), "staging file must be unlinked");
    assert!(!target.path().exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn drop_rolls_back_like_cleanup() {
    let dir = assert_fs::TempDir::new().unwrap();
    let target = dir.child("table.idx");

    {
        let mut stage = Stage::start(target.path()).unwrap();
        stage.write_all(b"abandoned").unwrap();
    }

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn cleanup_leaves_existing_target_alone() {
    let dir = assert_fs::TempDir::new().unwrap();
    let target = dir.child("table.idx");
    target.write_str("current").unwrap();

    let stage = Stage::start(target.path()).unwrap();
    stage.cleanup();

    target.assert("current");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}
