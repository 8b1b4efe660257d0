use std::path::{Path, PathBuf};

/// Resolves a path against a base directory.
///
/// Absolute paths are returned unchanged; relative paths are joined onto
/// `base`. No canonicalization happens here: a nonexistent path is still a
/// valid candidate and surfaces later as a stat error if it stays missing.
#[must_use]
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_is_unchanged() {
        let path = Path::new("/etc/hosts");
        assert_eq!(absolutize(path, Path::new("/base")), path);
    }

    #[test]
    fn test_relative_path_joins_base() {
        assert_eq!(
            absolutize(Path::new("src/main.rs"), Path::new("/work")),
            Path::new("/work/src/main.rs")
        );
    }
}
