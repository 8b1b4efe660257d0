#![warn(missing_docs)]
#![allow(clippy::arithmetic_side_effects)] // Simple counters and timestamp math cannot overflow
#![allow(clippy::float_arithmetic)] // Required for millisecond mtime handling

//! # Snapdiff - Snapshot-Based File Change Detection
//!
//! Snapdiff answers one question cheaply and reliably: which files under a
//! subtree were created, modified, or deleted since the last time we looked?
//! It is built for build tools and CI pipelines that want to skip work for
//! unchanged inputs without re-hashing the world on every run.
//!
//! ## Features
//!
//! - **Content Fingerprints**: Files are hashed with xxHash3, so a `touch`
//!   without a content change is never reported as an update
//! - **Timestamp Short-Circuit**: Files whose mtime has not moved reuse the
//!   previous digest without being re-read
//! - **Parallel Hashing**: Uses Rayon with a bounded worker pool
//! - **Persisted Snapshots**: State between runs lives in a validated JSON
//!   snapshot file
//! - **Glob Selection**: Candidate files come from glob patterns (with `!`
//!   negation) or an explicit file list
//!
//! ## Architecture
//!
//! - [`snapshot`]: The snapshot data model and the on-disk snapshot store
//! - [`fingerprint`]: Content hashing and the mtime short-circuit policy
//! - [`builder`]: Parallel snapshot assembly over a candidate file list
//! - [`diff`]: Change classification between two snapshots
//! - [`resolve`]: Glob pattern expansion and file-list resolution
//! - [`tracker`]: The `run` entry point tying the pieces together
//! - [`utils`]: Thread pool and path helpers
//!
//! ## Example Usage
//!
//! ```no_run
//! use snapdiff::{Options, run};
//!
//! # fn main() -> anyhow::Result<()> {
//! let outcome = run(&Options {
//!     patterns: vec!["src/**/*.rs".to_string(), "!src/generated/**".to_string()],
//!     ..Options::default()
//! })?;
//!
//! for change in &outcome.changes {
//!     println!("{} {}", change.status_char(), change.path().display());
//! }
//! # Ok(())
//! # }
//! ```

/// Parallel snapshot assembly over a resolved candidate file list.
pub mod builder;

/// Change records and the two-snapshot differ.
pub mod diff;

/// Content hashing and the timestamp short-circuit policy.
pub mod fingerprint;

/// Glob pattern expansion and explicit file-list resolution.
pub mod resolve;

/// Snapshot data model and the persisted snapshot store.
pub mod snapshot;

/// Run options and the orchestrating entry point.
pub mod tracker;

/// Thread pool and path helpers.
pub mod utils;

pub use diff::Change;
pub use snapshot::store::SnapshotStore;
pub use snapshot::{FileFingerprint, Snapshot};
pub use tracker::{Options, Outcome, run};

use anyhow::Result;

/// Current version of the snapdiff crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default snapshot filename, resolved against the working directory.
pub const DEFAULT_SNAPSHOT_FILE: &str = ".snapdiff.json";

/// Detects changes for a set of glob patterns using default options.
///
/// Convenience wrapper over [`run`] for the common case: patterns resolved
/// against the process working directory, snapshot loaded from and saved to
/// [`DEFAULT_SNAPSHOT_FILE`].
///
/// # Errors
/// Returns an error if `patterns` is empty, if the stored snapshot is
/// malformed, or if any file fails to stat or hash.
pub fn track<P: AsRef<str>>(patterns: &[P]) -> Result<Outcome> {
    run(&Options {
        patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
        ..Options::default()
    })
}
