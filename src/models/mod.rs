//! Shared data types.
//!
//! - `entry`: RepoEntry produced by the filesystem scanner
//! - `op`: operation kinds, per-target statuses, batch events and summaries

pub mod entry;
pub mod op;

pub use entry::*;
pub use op::*;
