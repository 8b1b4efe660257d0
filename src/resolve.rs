use crate::utils::paths::absolutize;
use anyhow::{Context, Result};
use glob::Pattern;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expands glob patterns into a sorted, deduplicated list of absolute file
/// paths.
///
/// Relative patterns are anchored at `cwd`. A leading `!` marks a pattern as
/// a negation: paths matched by any negated pattern are subtracted from the
/// result. Only regular files are returned; directories matched by a pattern
/// are skipped.
///
/// # Errors
/// Returns an error for a syntactically invalid pattern or an unreadable
/// path encountered during expansion.
pub fn resolve_patterns(patterns: &[String], cwd: &Path) -> Result<Vec<PathBuf>> {
    let mut includes = Vec::new();
    let mut excludes = Vec::new();

    for raw in patterns {
        if let Some(negated) = raw.strip_prefix('!') {
            let anchored = anchor_pattern(negated, cwd);
            excludes.push(
                Pattern::new(&anchored)
                    .with_context(|| format!("Invalid negation pattern: {raw}"))?,
            );
        } else {
            includes.push(anchor_pattern(raw, cwd));
        }
    }

    let mut matched = BTreeSet::new();
    for pattern in &includes {
        let paths =
            glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;
        for entry in paths {
            let path =
                entry.with_context(|| format!("Failed to read glob match for: {pattern}"))?;
            if !path.is_file() {
                continue;
            }
            if excludes.iter().any(|negated| negated.matches_path(&path)) {
                continue;
            }
            matched.insert(path);
        }
    }

    debug!(
        patterns = patterns.len(),
        files = matched.len(),
        "Resolved glob patterns"
    );
    Ok(matched.into_iter().collect())
}

/// Resolves an explicit file list against `cwd`.
///
/// Each entry is absolutized and used as-is, with no existence check and no
/// globbing; a missing file surfaces later as a stat error during the build.
/// Duplicates are collapsed, first occurrence wins for ordering.
#[must_use]
pub fn resolve_files(files: &[PathBuf], cwd: &Path) -> Vec<PathBuf> {
    let mut seen = BTreeSet::new();
    let mut resolved = Vec::with_capacity(files.len());

    for file in files {
        let path = absolutize(file, cwd);
        if seen.insert(path.clone()) {
            resolved.push(path);
        }
    }

    resolved
}

fn anchor_pattern(pattern: &str, cwd: &Path) -> String {
    if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        cwd.join(pattern).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_resolve_patterns_matches_files_only() -> Result<()> {
        let dir = tempdir()?;
        touch(&dir.path().join("a.rs"));
        touch(&dir.path().join("b.rs"));
        touch(&dir.path().join("c.txt"));
        std::fs::create_dir(dir.path().join("sub.rs"))?;

        let files = resolve_patterns(&["*.rs".to_string()], dir.path())?;
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.rs", "b.rs"]);
        Ok(())
    }

    #[test]
    fn test_recursive_pattern_and_negation() -> Result<()> {
        let dir = tempdir()?;
        touch(&dir.path().join("src/main.rs"));
        touch(&dir.path().join("src/generated/schema.rs"));
        touch(&dir.path().join("src/lib.rs"));

        let files = resolve_patterns(
            &[
                "src/**/*.rs".to_string(),
                "!src/generated/**".to_string(),
            ],
            dir.path(),
        )?;

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| !p.to_string_lossy().contains("generated")));
        Ok(())
    }

    #[test]
    fn test_overlapping_patterns_deduplicate() -> Result<()> {
        let dir = tempdir()?;
        touch(&dir.path().join("a.rs"));

        let files = resolve_patterns(&["*.rs".to_string(), "a.*".to_string()], dir.path())?;
        assert_eq!(files.len(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let result = resolve_patterns(&["src/[".to_string()], Path::new("/tmp"));
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_files_absolutizes_and_dedups() {
        let cwd = Path::new("/work");
        let files = resolve_files(
            &[
                PathBuf::from("a.txt"),
                PathBuf::from("/abs/b.txt"),
                PathBuf::from("a.txt"),
            ],
            cwd,
        );

        assert_eq!(
            files,
            vec![PathBuf::from("/work/a.txt"), PathBuf::from("/abs/b.txt")]
        );
    }
}
