#![cfg(unix)]

use std::fs;
use std::io::{Read, Write};
use std::os::unix::fs::{MetadataExt, PermissionsExt};

use stagefile::{Durability, Stage};
use tempfile::tempdir;

#[test]
fn replacement_preserves_mode_and_swaps_inode() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("table.idx");
    fs::write(&target, b"old").unwrap();
    fs::set_permissions(&target, fs::Permissions::from_mode(0o640)).unwrap();
    let old_ino = fs::metadata(&target).unwrap().ino();

    let mut stage = Stage::start(&target).unwrap();
    stage.write_all(b"new-content").unwrap();
    stage.finish(Durability::Full).unwrap();

    let meta = fs::metadata(&target).unwrap();
    assert_eq!(meta.permissions().mode() & 0o777, 0o640, "existing mode preserved");
    assert_ne!(meta.ino(), old_ino, "install must replace the inode");
    assert_eq!(fs::read(&target).unwrap(), b"new-content");
}

#[test]
fn concurrent_reader_sees_old_or_new_but_never_partial() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("table.idx");
    fs::write(&target, b"old").unwrap();

    let mut old_handle = fs::File::open(&target).unwrap();

    let mut stage = Stage::start(&target).unwrap();
    stage.write_all(b"new").unwrap();

    // Old content stays visible under the final name until the rename.
    assert_eq!(fs::read(&target).unwrap(), b"old");

    stage.finish(Durability::Data).unwrap();

    // A reader that already had the old file open keeps its content.
    let mut buf = String::new();
    old_handle.read_to_string(&mut buf).unwrap();
    assert_eq!(buf, "old");

    // Anyone opening by path from now on sees the new file.
    assert_eq!(fs::read(&target).unwrap(), b"new");
}
