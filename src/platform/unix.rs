//! Unix implementations of platform helpers.

use std::fs::{self, File};
use std::io;
use std::os::fd::IntoRawFd;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Permission bits applied to the installed file at commit time.
pub(crate) type TargetMode = u32;

/// Installed files are immutable after creation, so a missing target
/// defaults to the most restrictive sensible mode: owner-read-only.
pub(crate) const DEFAULT_TARGET_MODE: TargetMode = 0o400;

pub(crate) fn capture_mode(meta: &fs::Metadata) -> TargetMode {
    meta.permissions().mode() & 0o777
}

/// fchmod the open descriptor; the staging file is created 0600 and only
/// widened to the target mode here, at commit time.
pub(crate) fn apply_mode(file: &File, mode: TargetMode) -> io::Result<()> {
    file.set_permissions(fs::Permissions::from_mode(mode))
}

/// Close the descriptor and report the result. `drop(File)` would swallow
/// the error; NFS in particular may surface write errors only at close.
pub(crate) fn close_checked(file: File) -> io::Result<()> {
    let fd = file.into_raw_fd();
    if unsafe { libc::close(fd) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// fsync the directory so a completed rename survives power loss.
pub(crate) fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = File::open(dir)?;
    f.sync_all()
}
