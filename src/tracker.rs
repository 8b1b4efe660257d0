use crate::diff::{Change, diff};
use crate::snapshot::Snapshot;
use crate::snapshot::store::SnapshotStore;
use crate::{DEFAULT_SNAPSHOT_FILE, builder, resolve};
use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use tracing::debug;

/// Configuration for one change-detection run.
///
/// Exactly one selection input is required: `patterns` or `files`. When both
/// are given, `files` wins and the patterns are ignored.
#[derive(Debug, Clone)]
pub struct Options {
    /// Glob patterns selecting candidate files; `!` prefixes negate.
    pub patterns: Vec<String>,
    /// Explicit candidate files, bypassing glob expansion.
    pub files: Vec<PathBuf>,
    /// Force a full re-hash, ignoring the timestamp short-circuit.
    pub always_hash: bool,
    /// Base directory for relative patterns, files, and the snapshot file.
    /// Defaults to the process working directory.
    pub cwd: Option<PathBuf>,
    /// Whether to persist the new snapshot after diffing. Defaults to true.
    pub save_snapshot: bool,
    /// In-memory previous snapshot, taking precedence over loading from the
    /// snapshot file.
    pub snapshot: Option<Snapshot>,
    /// Where to load the previous snapshot from and save the new one to.
    /// Defaults to [`DEFAULT_SNAPSHOT_FILE`] under the working directory.
    pub snapshot_file: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            files: Vec::new(),
            always_hash: false,
            cwd: None,
            save_snapshot: true,
            snapshot: None,
            snapshot_file: None,
        }
    }
}

/// The outcome of one change-detection run.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The freshly built snapshot of all candidate files.
    pub snapshot: Snapshot,
    /// Deletions first, then creates and updates, lexicographic by path.
    pub changes: Vec<Change>,
}

/// Resolves candidates, fingerprints them, diffs against the previous
/// snapshot, and (unless opted out) persists the result.
///
/// The previous snapshot comes from `options.snapshot` when supplied,
/// otherwise from the snapshot file; an absent file means an empty previous
/// snapshot. Persistence happens after the diff, so a write failure leaves
/// the stale file on disk for the next run, but it is still fatal for this
/// invocation.
///
/// # Errors
/// Returns an error if neither patterns nor files are provided, if a stored
/// snapshot fails shape validation, or on any underlying stat, read, hash,
/// or write failure. All failures are fatal; there is no partial result.
pub fn run(options: &Options) -> Result<Outcome> {
    if options.patterns.is_empty() && options.files.is_empty() {
        bail!("neither patterns nor files provided");
    }

    let cwd = match &options.cwd {
        Some(cwd) => cwd.clone(),
        None => std::env::current_dir().context("Failed to determine working directory")?,
    };
    let snapshot_path = options
        .snapshot_file
        .clone()
        .unwrap_or_else(|| cwd.join(DEFAULT_SNAPSHOT_FILE));
    let store = SnapshotStore::new(snapshot_path);

    let previous = match &options.snapshot {
        Some(snapshot) => snapshot.clone(),
        None => store.load()?,
    };

    let candidates = if options.files.is_empty() {
        resolve::resolve_patterns(&options.patterns, &cwd)?
    } else {
        resolve::resolve_files(&options.files, &cwd)
    };
    debug!(
        candidates = candidates.len(),
        previous = previous.len(),
        always_hash = options.always_hash,
        "Starting snapshot build"
    );

    let snapshot = builder::build_snapshot(&candidates, &previous, options.always_hash)?;
    let changes = diff(&previous, &snapshot);

    if options.save_snapshot {
        store.save(&snapshot)?;
    }

    Ok(Outcome { snapshot, changes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_selection_input_is_a_configuration_error() {
        let err = run(&Options::default()).unwrap_err();
        assert!(err.to_string().contains("neither patterns nor files"));
    }
}
