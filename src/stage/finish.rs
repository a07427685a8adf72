//! The commit sequence: apply mode, optional durability barrier, checked
//! close, atomic rename, best-effort parent-directory fsync.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::context::Stage;
use crate::errors::{CommitStep, StageError};
use crate::platform;

/// Durability applied by [`Stage::finish`] before the rename.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Durability {
    /// Leave written data in the OS page cache. Fastest; the install may be
    /// lost on sudden power failure.
    Data,
    /// Force file data to stable storage (fdatasync-equivalent) before the
    /// rename. Highest integrity; synchronous and potentially slow.
    Full,
}

/// A failed commit, handing the [`Stage`] back to the caller.
///
/// The staging file is still on disk and unmodified; dropping or
/// [`Stage::cleanup`]-ing the contained stage removes it. Same shape as
/// `tempfile::PersistError`.
#[derive(Debug)]
pub struct FinishError {
    /// What went wrong, including the commit step that failed.
    pub error: StageError,
    /// The stage, for rollback at a point of the caller's choosing.
    pub stage: Stage,
}

impl fmt::Display for FinishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for FinishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<FinishError> for StageError {
    /// Drops the stage, which rolls the staging file back.
    fn from(e: FinishError) -> StageError {
        e.error
    }
}

impl Stage {
    /// Commit the staging file as the new final file.
    ///
    /// Sequence: apply the captured permission mode, optionally force
    /// durability, close the descriptor with the result checked, then
    /// atomically rename onto the final path. On success returns the final
    /// path; there is no window in which the final name is missing or refers
    /// to a partially written file.
    ///
    /// The first failure short-circuits and hands the stage back inside
    /// [`FinishError`], with the staging file left intact on disk. Rollback
    /// is deliberately not performed here: the caller decides when it
    /// happens, by dropping or [`Stage::cleanup`]-ing the returned stage.
    pub fn finish(mut self, durability: Durability) -> Result<PathBuf, FinishError> {
        let Some(temp_path) = self.temp_path.clone() else {
            let error = StageError::Closed(self.final_path.clone());
            return Err(FinishError { error, stage: self });
        };
        let Some(file) = self.file.take() else {
            let error = StageError::Closed(self.final_path.clone());
            return Err(FinishError { error, stage: self });
        };

        if let Err(source) = platform::apply_mode(&file, self.target_mode) {
            self.file = Some(file);
            return Err(self.commit_err(CommitStep::Permissions, source));
        }

        if durability == Durability::Full {
            if let Err(source) = file.sync_data() {
                self.file = Some(file);
                return Err(self.commit_err(CommitStep::Durability, source));
            }
        }

        // The descriptor slot is already cleared here, so a rename failure
        // followed by rollback cannot double-close.
        if let Err(source) = platform::close_checked(file) {
            return Err(self.commit_err(CommitStep::Close, source));
        }

        if let Err(source) = overwrite_rename(&temp_path, &self.final_path) {
            return Err(self.commit_err(CommitStep::Rename, source));
        }
        self.temp_path = None;

        // Persist the rename itself. Ignore fsync errors to avoid turning a
        // successful install into a failure.
        #[cfg(unix)]
        if let Some(parent) = self.final_path.parent() {
            let _ = platform::fsync_dir(parent);
        }

        debug!(path = %self.final_path.display(), "installed staged file");
        Ok(self.final_path.clone())
    }

    fn commit_err(self, step: CommitStep, source: io::Error) -> FinishError {
        let error = StageError::Commit {
            step,
            path: self.final_path.clone(),
            source,
        };
        FinishError { error, stage: self }
    }
}

/// Atomic rename that replaces any existing file at the destination.
fn overwrite_rename(src: &Path, dst: &Path) -> io::Result<()> {
    // Windows: rename does not overwrite, so clear the destination first.
    // This opens a small window with no file at the final name, a known
    // limitation of the platform. A previous install left the destination
    // readonly, which would make the removal itself fail.
    #[cfg(windows)]
    {
        if let Err(e) = crate::platform::clear_readonly(dst) {
            if e.kind() != io::ErrorKind::NotFound {
                return Err(e);
            }
        }
        if let Err(e) = fs::remove_file(dst) {
            if e.kind() != io::ErrorKind::NotFound {
                return Err(e);
            }
        }
    }

    fs::rename(src, dst)
}
