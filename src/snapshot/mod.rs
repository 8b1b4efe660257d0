/// Persisted snapshot loading, saving, and shape validation.
pub mod store;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The observed state of one file at one point in time.
///
/// `mtime_ms` is the filesystem modification timestamp in float milliseconds,
/// kept at full sub-millisecond precision because it is the sole signal used
/// to skip re-hashing. It is compared with exact equality, never a tolerance,
/// and is not validated for monotonicity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFingerprint {
    /// XXH3 128-bit content hash, hex encoded (32 characters).
    pub hash: String,
    /// Modification timestamp in milliseconds since the Unix epoch.
    #[serde(rename = "mtimeMs")]
    pub mtime_ms: f64,
}

/// A complete mapping from absolute file path to [`FileFingerprint`],
/// representing observed filesystem state at one instant.
///
/// A snapshot is created empty or loaded from storage at the start of an
/// operation, and only ever replaced wholesale by a build, never patched
/// entry by entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: HashMap<PathBuf, FileFingerprint>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a snapshot from a pre-built entry map.
    #[must_use]
    pub fn from_entries(entries: HashMap<PathBuf, FileFingerprint>) -> Self {
        Self { entries }
    }

    /// Returns the fingerprint recorded for `path`, if any.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&FileFingerprint> {
        self.entries.get(path)
    }

    /// Returns true if `path` has an entry in this snapshot.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Inserts or replaces the fingerprint for `path`.
    pub fn insert(&mut self, path: PathBuf, fingerprint: FileFingerprint) {
        self.entries.insert(path, fingerprint);
    }

    /// Returns the number of files in this snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if this snapshot has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(path, fingerprint)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &FileFingerprint)> {
        self.entries.iter()
    }

    /// Returns all paths in this snapshot, sorted lexicographically.
    #[must_use]
    pub fn sorted_paths(&self) -> Vec<&PathBuf> {
        let mut paths: Vec<_> = self.entries.keys().collect();
        paths.sort();
        paths
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a PathBuf, &'a FileFingerprint);
    type IntoIter = std::collections::hash_map::Iter<'a, PathBuf, FileFingerprint>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
