use anyhow::Result;
use filetime::FileTime;
use snapdiff::Options;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test filesystem fixture: a temporary tree plus run options wired to it.
pub struct TestTree {
    pub temp_dir: TempDir,
}

#[allow(dead_code)] // Not every suite uses every helper
impl TestTree {
    pub fn new() -> Result<Self> {
        init_tracing();
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file under the tree, creating parent directories as needed.
    pub fn write(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        std::fs::remove_file(self.path().join(name))?;
        Ok(())
    }

    /// Capture a file's modification time for later restoration.
    pub fn mtime(&self, name: &str) -> Result<FileTime> {
        let metadata = std::fs::metadata(self.path().join(name))?;
        Ok(FileTime::from_last_modification_time(&metadata))
    }

    /// Restore a previously captured modification time.
    pub fn set_mtime(&self, name: &str, mtime: FileTime) -> Result<()> {
        filetime::set_file_mtime(self.path().join(name), mtime)?;
        Ok(())
    }

    /// Push a file's mtime one second forward.
    ///
    /// Rewriting a file within the filesystem's timestamp granularity can
    /// leave the mtime unchanged, which the short-circuit would then trust;
    /// tests that expect a re-hash bump the mtime explicitly.
    pub fn bump_mtime(&self, name: &str) -> Result<()> {
        let current = self.mtime(name)?;
        let bumped = FileTime::from_unix_time(current.unix_seconds() + 1, current.nanoseconds());
        self.set_mtime(name, bumped)
    }

    pub fn snapshot_file(&self) -> PathBuf {
        self.path().join("snapshot.json")
    }

    /// Run options rooted at this tree, with the snapshot stored alongside.
    pub fn options(&self, patterns: &[&str]) -> Options {
        Options {
            patterns: patterns.iter().map(ToString::to_string).collect(),
            cwd: Some(self.path().to_path_buf()),
            snapshot_file: Some(self.snapshot_file()),
            ..Options::default()
        }
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new().expect("Failed to create test tree")
    }
}

/// Install a subscriber honoring `RUST_LOG` so failing tests can be rerun
/// with tracing output.
fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
