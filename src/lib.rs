//! Crash-safe staging and atomic installation of immutable files.
//!
//! A new version of a read-only data file is built entirely in a hidden
//! staging file next to its final name and becomes visible only through a
//! single atomic rename, after permissions and (optionally) durability have
//! been settled. A concurrent reader opening the final path sees either the
//! old complete file or the new complete file, never a partial one; a crash
//! at any point leaves the previously installed file untouched.
//!
//! The protocol is three operations on a caller-owned [`Stage`]:
//! [`Stage::start`] creates the staging file, the caller streams the payload
//! through the stage's `Write` impl (or the raw file handle from
//! [`Stage::as_file_mut`]), and [`Stage::finish`] commits. Any failure rolls
//! back through [`Stage::cleanup`] or simply by dropping the stage.
//! [`write_atomic`] wraps the whole sequence for callers that produce the
//! payload in one closure.
//!
//! Writers targeting the same final path are not serialized here: the rename
//! is the sole serialization point and the last writer wins. The final path
//! must stay on one filesystem; a cross-volume rename would not be atomic.
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//! use stagefile::{Durability, Stage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let target = dir.path().join("table.idx");
//!
//! let mut stage = Stage::start(&target)?;
//! stage.write_all(b"record data")?;
//! let installed = stage.finish(Durability::Full)?;
//! assert_eq!(installed, target);
//! # Ok(())
//! # }
//! ```

mod errors;
mod platform;
mod stage;
mod writer;

pub use errors::{CommitStep, StageError};
pub use stage::{Durability, FinishError, Stage};
pub use writer::write_atomic;
