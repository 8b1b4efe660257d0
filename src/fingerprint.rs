use crate::snapshot::FileFingerprint;
use anyhow::{Context, Result};
use memmap2::MmapOptions;
use std::fs::{File, Metadata};
use std::path::Path;
use std::time::UNIX_EPOCH;
use tracing::trace;
use xxhash_rust::xxh3::xxh3_128;

/// Files at or above this size are hashed through a memory map instead of a
/// buffered read.
const MMAP_THRESHOLD: u64 = 1_048_576;

/// Computes the XXH3 128-bit hash of raw bytes, hex encoded.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> String {
    let hash = xxh3_128(data);
    format!("{hash:032x}")
}

/// Computes the content hash of a file.
///
/// Small files are read directly; files of 1MB or more are memory-mapped.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub fn hash_file(path: &Path) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to get metadata for: {}", path.display()))?;

    if metadata.len() == 0 {
        return Ok(hash_bytes(b""));
    }

    if metadata.len() < MMAP_THRESHOLD {
        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok(hash_bytes(&content))
    } else {
        let mmap = unsafe { MmapOptions::new().map(&file) }
            .with_context(|| format!("Failed to mmap file: {}", path.display()))?;
        Ok(hash_bytes(&mmap))
    }
}

/// Extracts the modification timestamp from file metadata as float
/// milliseconds since the Unix epoch.
///
/// Sub-millisecond precision is preserved: it is the signal the
/// short-circuit in [`fingerprint_file`] compares with exact equality.
///
/// # Errors
/// Returns an error if the platform reports no modification time or one
/// before the Unix epoch.
pub fn mtime_millis(metadata: &Metadata) -> Result<f64> {
    let modified = metadata
        .modified()
        .context("Failed to get file modification time")?
        .duration_since(UNIX_EPOCH)
        .context("File modification time predates the Unix epoch")?;

    #[allow(clippy::cast_precision_loss)]
    let millis =
        modified.as_secs() as f64 * 1_000.0 + f64::from(modified.subsec_nanos()) / 1_000_000.0;
    Ok(millis)
}

/// Produces the fingerprint for one file.
///
/// `mtime_ms` must come from a stat taken immediately before this call, not
/// from an earlier cached observation. When `always_hash` is false and the
/// previous entry carries exactly the same `mtime_ms`, the previous hash is
/// reused without reading the file at all; otherwise the file's current
/// bytes are hashed. Either way the returned fingerprint carries the freshly
/// observed `mtime_ms`.
///
/// # Errors
/// Returns an error if the file cannot be read or hashed. The failure is
/// fatal for the whole build; there is no per-file skip.
pub fn fingerprint_file(
    path: &Path,
    mtime_ms: f64,
    previous: Option<&FileFingerprint>,
    always_hash: bool,
) -> Result<FileFingerprint> {
    if !always_hash
        && let Some(previous) = previous
        && previous.mtime_ms == mtime_ms
    {
        trace!(path = %path.display(), "Unchanged mtime, reusing previous hash");
        return Ok(FileFingerprint {
            hash: previous.hash.clone(),
            mtime_ms,
        });
    }

    let hash = hash_file(path)?;
    trace!(path = %path.display(), %hash, "Hashed file content");
    Ok(FileFingerprint { hash, mtime_ms })
}
