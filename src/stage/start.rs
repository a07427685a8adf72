//! Stage creation: target inspection and exclusive staging-file open.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use tracing::trace;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use super::context::Stage;
use super::temp::staging_sibling;
use crate::errors::StageError;
use crate::platform;

/// Attempts before giving up on finding an unused staging name. Collisions
/// require another process to guess a pid/nanosecond/sequence triple, so one
/// retry would already be surprising.
const CREATE_ATTEMPTS: u32 = 16;

impl Stage {
    /// Begin a staged build targeting `final_path`.
    ///
    /// Records the permission mode to restore at commit: the target's
    /// current mode if a regular file already exists there, owner-read-only
    /// otherwise. Then creates a hidden staging file in the target's
    /// directory, exclusively (`create_new`, which also refuses to follow a
    /// pre-planted symlink at the chosen name) and privately (mode 0600 on
    /// Unix, set atomically at open rather than via the process-wide umask).
    ///
    /// No filesystem state is mutated on any failure path.
    pub fn start(final_path: impl AsRef<Path>) -> Result<Stage, StageError> {
        let final_path = final_path.as_ref();
        if final_path.file_name().is_none() {
            return Err(StageError::InvalidTarget(final_path.to_path_buf()));
        }

        // Follows symlinks: replacing through a symlinked final name adopts
        // the mode of the link's target.
        let target_mode = match fs::metadata(final_path) {
            Ok(meta) if meta.is_file() => platform::capture_mode(&meta),
            Ok(_) => return Err(StageError::InvalidTarget(final_path.to_path_buf())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => platform::DEFAULT_TARGET_MODE,
            Err(e) => {
                return Err(StageError::TargetUnreadable {
                    path: final_path.to_path_buf(),
                    source: e,
                });
            }
        };

        let mut last_attempt = None;
        for _ in 0..CREATE_ATTEMPTS {
            let temp_path = staging_sibling(final_path);
            let mut opts = OpenOptions::new();
            opts.read(true).write(true).create_new(true);
            #[cfg(unix)]
            opts.mode(0o600);

            match opts.open(&temp_path) {
                Ok(file) => {
                    trace!(
                        temp = %temp_path.display(),
                        target = %final_path.display(),
                        "created staging file"
                    );
                    return Ok(Stage {
                        file: Some(file),
                        temp_path: Some(temp_path),
                        final_path: final_path.to_path_buf(),
                        target_mode,
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    last_attempt = Some(temp_path);
                    continue;
                }
                Err(e) => {
                    return Err(StageError::Create {
                        path: temp_path,
                        source: e,
                    });
                }
            }
        }

        Err(StageError::Create {
            path: last_attempt.unwrap_or_else(|| final_path.to_path_buf()),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("no unused staging name after {CREATE_ATTEMPTS} attempts"),
            ),
        })
    }
}
