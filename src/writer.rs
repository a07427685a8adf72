//! One-shot atomic write built on the staging protocol.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::StageError;
use crate::stage::{Durability, Stage};

/// Write a complete file atomically: stage next to `target`, run `write_fn`
/// against the staging file, then commit. Any failure, including a failing
/// `write_fn`, rolls the staging file back and leaves whatever was
/// previously installed at `target` untouched.
///
/// Returns the installed path on success.
///
/// # Example
///
/// ```
/// use std::io::Write;
/// use stagefile::{write_atomic, Durability};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let target = dir.path().join("index.db");
/// write_atomic(&target, Durability::Full, |f| f.write_all(b"payload"))?;
/// assert_eq!(std::fs::read(&target)?, b"payload");
/// # Ok(())
/// # }
/// ```
pub fn write_atomic<F>(
    target: impl AsRef<Path>,
    durability: Durability,
    write_fn: F,
) -> Result<PathBuf, StageError>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let target = target.as_ref();
    let mut stage = Stage::start(target)?;

    // A freshly started stage always has an open file; dropping the stage on
    // this error path still rolls the staging file back.
    let file = stage
        .as_file_mut()
        .ok_or_else(|| StageError::Closed(target.to_path_buf()))?;

    if let Err(source) = write_fn(file) {
        let error = StageError::Payload {
            path: target.to_path_buf(),
            source,
        };
        stage.cleanup();
        return Err(error);
    }

    stage.finish(durability).map_err(StageError::from)
}
