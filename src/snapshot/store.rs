use super::{FileFingerprint, Snapshot};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads and persists snapshots at a fixed filesystem path.
///
/// The on-disk format is a JSON object keyed by absolute file path, each
/// value an object with exactly a string `hash` and a numeric `mtimeMs`.
/// Stored data is never trusted: every load passes through an explicit
/// shape check before it becomes a typed [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Creates a store backed by the given file path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path this store reads from and writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored snapshot.
    ///
    /// An absent file is a valid empty snapshot, not an error. A present but
    /// malformed file fails validation rather than being silently accepted.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails the snapshot shape check.
    pub fn load(&self) -> Result<Snapshot> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No snapshot file, starting empty");
            return Ok(Snapshot::new());
        }

        let data = std::fs::read(&self.path)
            .with_context(|| format!("Failed to read snapshot file: {}", self.path.display()))?;
        let value: Value = serde_json::from_slice(&data)
            .with_context(|| format!("Snapshot file is not valid JSON: {}", self.path.display()))?;

        validate_snapshot(&value)
            .with_context(|| format!("Invalid snapshot file: {}", self.path.display()))
    }

    /// Persists `snapshot`, replacing any previous file.
    ///
    /// Entries are written sorted by path so the file is stable across runs
    /// with identical state.
    ///
    /// # Errors
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be written.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let mut map = serde_json::Map::with_capacity(snapshot.len());
        for path in snapshot.sorted_paths() {
            if let Some(fp) = snapshot.get(path) {
                map.insert(
                    path.display().to_string(),
                    serde_json::json!({ "hash": fp.hash, "mtimeMs": fp.mtime_ms }),
                );
            }
        }

        let data = serde_json::to_vec_pretty(&Value::Object(map))
            .context("Failed to serialize snapshot")?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(&self.path, &data)
            .with_context(|| format!("Failed to write snapshot file: {}", self.path.display()))?;

        debug!(path = %self.path.display(), files = snapshot.len(), "Snapshot saved");
        Ok(())
    }
}

/// Checks that a deserialized JSON value has the snapshot shape and converts
/// it into a typed [`Snapshot`].
///
/// # Errors
/// Returns an error naming the offending entry if the top-level value is not
/// an object, any entry value is not an object, or `hash`/`mtimeMs` are
/// missing or mistyped.
pub fn validate_snapshot(value: &Value) -> Result<Snapshot> {
    let Some(object) = value.as_object() else {
        bail!("snapshot must be a JSON object, found {}", json_kind(value));
    };

    let mut entries = HashMap::with_capacity(object.len());
    for (path, raw) in object {
        let Some(fields) = raw.as_object() else {
            bail!("entry for '{path}' must be an object, found {}", json_kind(raw));
        };
        let hash = match fields.get("hash") {
            Some(Value::String(hash)) => hash.clone(),
            Some(other) => bail!("entry for '{path}' has non-string 'hash' ({})", json_kind(other)),
            None => bail!("entry for '{path}' is missing 'hash'"),
        };
        let mtime_ms = match fields.get("mtimeMs") {
            Some(Value::Number(n)) => n
                .as_f64()
                .with_context(|| format!("entry for '{path}' has unrepresentable 'mtimeMs'"))?,
            Some(other) => bail!(
                "entry for '{path}' has non-numeric 'mtimeMs' ({})",
                json_kind(other)
            ),
            None => bail!("entry for '{path}' is missing 'mtimeMs'"),
        };
        entries.insert(PathBuf::from(path), FileFingerprint { hash, mtime_ms });
    }

    Ok(Snapshot::from_entries(entries))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
