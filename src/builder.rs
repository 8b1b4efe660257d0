use crate::fingerprint::{fingerprint_file, mtime_millis};
use crate::snapshot::{FileFingerprint, Snapshot};
use crate::utils::thread_pool;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Builds a snapshot for the given candidate files.
///
/// Every path is stat-ed fresh, matched against its entry in `previous` (if
/// any), and fingerprinted; the per-file work runs in parallel inside the
/// bounded worker pool. The result contains exactly one entry per input path
/// and carries nothing over from `previous` for paths no longer listed.
///
/// `paths` is expected to be deduplicated by the resolution step; duplicate
/// entries would silently collapse into one map slot.
///
/// # Errors
/// Returns an error if any single file fails to stat, read, or hash. The
/// build is all-or-nothing: the first failure aborts it and no partial
/// snapshot is returned.
pub fn build_snapshot(
    paths: &[PathBuf],
    previous: &Snapshot,
    always_hash: bool,
) -> Result<Snapshot> {
    let entries = thread_pool::run_in_pool(|| {
        paths
            .par_iter()
            .map(|path| {
                let fingerprint = fingerprint_path(path, previous, always_hash)?;
                Ok((path.clone(), fingerprint))
            })
            .collect::<Result<HashMap<PathBuf, FileFingerprint>>>()
    })?;

    debug!(files = entries.len(), always_hash, "Snapshot build complete");
    Ok(Snapshot::from_entries(entries))
}

/// Stats one file and fingerprints it against its previous entry.
///
/// The stat happens here, immediately before fingerprinting, so the mtime
/// handed to the short-circuit check is never stale.
fn fingerprint_path(
    path: &Path,
    previous: &Snapshot,
    always_hash: bool,
) -> Result<FileFingerprint> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat file: {}", path.display()))?;
    let mtime_ms = mtime_millis(&metadata)
        .with_context(|| format!("Failed to read mtime for: {}", path.display()))?;

    fingerprint_file(path, mtime_ms, previous.get(path), always_hash)
}
