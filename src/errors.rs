//! Typed error definitions for stagefile.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Steps of the commit sequence, in the order [`Stage::finish`] attempts
/// them. Each step gates the next; the first failure short-circuits.
///
/// [`Stage::finish`]: crate::Stage::finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStep {
    /// Applying the captured permission mode to the open staging file.
    Permissions,
    /// Forcing written data to stable storage.
    Durability,
    /// Closing the staging descriptor. NFS can report deferred write errors
    /// here rather than at write time.
    Close,
    /// Atomically renaming the staging file onto the final path.
    Rename,
}

impl fmt::Display for CommitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommitStep::Permissions => "set permissions",
            CommitStep::Durability => "sync data",
            CommitStep::Close => "close",
            CommitStep::Rename => "rename",
        })
    }
}

#[derive(Debug, Error)]
pub enum StageError {
    /// Final path has no file-name component, or it exists but is not a
    /// regular file (directory, socket, device node, ...).
    #[error("Install target is not a regular file: {0}")]
    InvalidTarget(PathBuf),

    /// Metadata for the final path could not be read for a reason other
    /// than non-existence.
    #[error("Cannot stat install target {path}")]
    TargetUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Exclusive creation of the staging file failed.
    #[error("Cannot create staging file {path}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The payload writer handed to [`write_atomic`] failed.
    ///
    /// [`write_atomic`]: crate::write_atomic
    #[error("Writing payload into staging file for {path} failed")]
    Payload {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The staging descriptor was already closed by an earlier `finish`.
    #[error("Staging file for {0} is already closed")]
    Closed(PathBuf),

    /// A step of the commit sequence failed. The staging file is left on
    /// disk for the caller to roll back.
    #[error("Commit step '{step}' failed for {path}")]
    Commit {
        step: CommitStep,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StageError {
    /// The underlying I/O error, when one exists.
    pub fn io_source(&self) -> Option<&io::Error> {
        match self {
            StageError::InvalidTarget(_) | StageError::Closed(_) => None,
            StageError::TargetUnreadable { source, .. }
            | StageError::Create { source, .. }
            | StageError::Payload { source, .. }
            | StageError::Commit { source, .. } => Some(source),
        }
    }
}
