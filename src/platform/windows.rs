//! Windows implementations of platform helpers.
//! POSIX mode bits map onto the readonly attribute here; that is the only
//! permission the platform lets us preserve across a replacement.

use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Readonly attribute applied to the installed file at commit time.
pub(crate) type TargetMode = bool;

/// Installed files are immutable after creation; default to readonly.
pub(crate) const DEFAULT_TARGET_MODE: TargetMode = true;

pub(crate) fn capture_mode(meta: &fs::Metadata) -> TargetMode {
    meta.permissions().readonly()
}

pub(crate) fn apply_mode(file: &File, readonly: TargetMode) -> io::Result<()> {
    let mut perms = file.metadata()?.permissions();
    perms.set_readonly(readonly);
    file.set_permissions(perms)
}

pub(crate) fn close_checked(file: File) -> io::Result<()> {
    drop(file);
    Ok(())
}

/// Clear the readonly attribute so the file can be removed or replaced.
/// Installed files carry the attribute, and the platform refuses to delete
/// a file while it is set.
pub(crate) fn clear_readonly(path: &Path) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    if perms.readonly() {
        perms.set_readonly(false);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}
