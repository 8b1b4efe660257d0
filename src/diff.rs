use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One detected difference between two snapshots.
///
/// Produced only by [`diff`] and never mutated afterwards. A rename shows up
/// as a `Deleted`/`Created` pair; this is a two-point comparison with no
/// history and no rename heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    /// File present now but absent from the previous snapshot.
    Created(PathBuf),
    /// File present in both snapshots with differing content hashes.
    Updated(PathBuf),
    /// File present in the previous snapshot but gone now.
    Deleted(PathBuf),
}

impl Change {
    /// Returns the path this change refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Created(p) | Self::Updated(p) | Self::Deleted(p) => p,
        }
    }

    /// Returns a single-character representation of the change kind.
    #[must_use]
    pub const fn status_char(&self) -> char {
        match self {
            Self::Created(_) => 'A',
            Self::Updated(_) => 'M',
            Self::Deleted(_) => 'D',
        }
    }
}

/// Computes the changes that turn `previous` into `next`.
///
/// Deletions come first, then creates and updates, each pass in
/// lexicographic path order, so the output is deterministic for a given pair
/// of snapshots. Only content hashes are compared: a file whose timestamp
/// moved but whose bytes did not produces no record.
#[must_use]
pub fn diff(previous: &Snapshot, next: &Snapshot) -> Vec<Change> {
    let mut changes = Vec::new();

    for path in previous.sorted_paths() {
        if !next.contains(path) {
            changes.push(Change::Deleted(path.clone()));
        }
    }

    for path in next.sorted_paths() {
        let Some(new) = next.get(path) else { continue };
        match previous.get(path) {
            None => changes.push(Change::Created(path.clone())),
            Some(old) if old.hash != new.hash => changes.push(Change::Updated(path.clone())),
            Some(_) => {}
        }
    }

    debug!(
        previous = previous.len(),
        next = next.len(),
        changes = changes.len(),
        "Computed snapshot diff"
    );
    changes
}
