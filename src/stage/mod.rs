//! The staged-installation lifecycle: start, finish, cleanup.
//!
//! One [`Stage`] value tracks one build from staging-file creation through
//! either atomic installation or rollback:
//!
//! - open, payload being written: both the file handle and the staging path
//!   are held;
//! - commit in flight: `finish` clears the file handle before attempting the
//!   rename, so a rename failure can never double-close;
//! - terminal: installed (both cleared, staging path renamed away) or rolled
//!   back (both cleared, staging file unlinked).
//!
//! `finish` and `cleanup` consume the stage, so a started build can only be
//! terminated once; the rollback for an abandoned stage runs on drop.

mod context;
mod finish;
mod start;
mod temp;

pub use context::Stage;
pub use finish::{Durability, FinishError};
