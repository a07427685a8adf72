//! Per-build staging state: the context driven by start/finish/cleanup.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

use crate::platform::TargetMode;

/// Context for one staged installation.
///
/// Invariant: `file` and `temp_path` are set together by [`Stage::start`];
/// `finish` clears `file` before it attempts the rename and clears
/// `temp_path` once the rename succeeds; rollback clears both.
#[derive(Debug)]
pub struct Stage {
    pub(super) file: Option<File>,
    pub(super) temp_path: Option<PathBuf>,
    pub(super) final_path: PathBuf,
    pub(super) target_mode: TargetMode,
}

impl Stage {
    /// Path the completed file will be installed under.
    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Path of the not-yet-visible staging file, while one exists on disk.
    pub fn temp_path(&self) -> Option<&Path> {
        self.temp_path.as_deref()
    }

    /// Handle to the open staging file, for a payload builder that wants the
    /// raw descriptor. `None` once `finish` has closed it.
    pub fn as_file(&self) -> Option<&File> {
        self.file.as_ref()
    }

    /// Mutable variant of [`Stage::as_file`].
    pub fn as_file_mut(&mut self) -> Option<&mut File> {
        self.file.as_mut()
    }

    /// Best-effort rollback: unlink the staging file, then close the
    /// descriptor, ignoring errors on both. Callers keep whatever error
    /// triggered the rollback; nothing here can mask it.
    ///
    /// Dropping a `Stage` performs the same rollback. This method exists for
    /// callers that want the rollback at a precise point rather than at end
    /// of scope.
    pub fn cleanup(mut self) {
        self.rollback();
    }

    pub(super) fn rollback(&mut self) {
        if let Some(path) = self.temp_path.take() {
            // A commit that failed after its permission step may have left
            // the staging file readonly, which blocks deletion on Windows.
            #[cfg(windows)]
            let _ = crate::platform::clear_readonly(&path);
            match fs::remove_file(&path) {
                Ok(()) => trace!(path = %path.display(), "removed staging file"),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove staging file")
                }
            }
        }
        if let Some(file) = self.file.take() {
            // Close errors have nowhere to go on this path.
            drop(file);
        }
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.rollback();
    }
}

impl Write for Stage {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(f) => f.write(buf),
            None => Err(closed()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(f) => f.flush(),
            None => Err(closed()),
        }
    }
}

fn closed() -> io::Error {
    io::Error::other("staging file already closed")
}
