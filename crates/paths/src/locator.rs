use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{PathsError, Result};
use crate::session::{ScanKey, SessionDirectorySource};

/// Raw acquisition files are ScanImage tiffs.
pub const TIFF_PATTERN: &str = "*.tif";

/// Resolve `relative` against an ordered list of candidate roots.
///
/// Returns the first root joined with `relative` that exists on disk.
/// The root list is checked before any filesystem access so that a missing
/// configuration fails fast.
pub fn find_full_path(roots: &[PathBuf], relative: impl AsRef<Path>) -> Result<PathBuf> {
    let relative = relative.as_ref();
    if roots.is_empty() {
        return Err(PathsError::MissingRootConfig);
    }

    for root in roots {
        let candidate = root.join(relative);
        if candidate.exists() {
            log::debug!("resolved {} under {}", relative.display(), root.display());
            return Ok(candidate);
        }
        log::debug!("{} not present under {}", relative.display(), root.display());
    }

    Err(PathsError::PathNotFound {
        relative: relative.to_path_buf(),
    })
}

/// Recursively collect files under `dir` whose names match `pattern`.
///
/// The list is materialized at call time, in traversal order (not sorted).
/// Unreadable entries are skipped with a warning rather than aborting the
/// walk.
pub fn find_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = GlobBuilder::new(pattern).build()?.compile_matcher();

    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("failed to read entry under {}: {e}", dir.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if matcher.is_match(entry.file_name()) {
            files.push(entry.into_path());
        }
    }

    log::debug!(
        "found {} file(s) matching {pattern} in {}",
        files.len(),
        dir.display()
    );
    Ok(files)
}

/// Translates scan keys into concrete file paths on disk.
///
/// Stateless per call: configuration and the session-directory source are
/// injected at construction and only read afterwards.
pub struct VolumeFileLocator<S> {
    config: Config,
    sessions: S,
}

impl<S: SessionDirectorySource> VolumeFileLocator<S> {
    pub fn new(config: Config, sessions: S) -> Self {
        Self { config, sessions }
    }

    /// Absolute session directory for a scan key.
    pub fn session_dir(&self, key: &ScanKey) -> Result<PathBuf> {
        let relative = self
            .sessions
            .session_dir(key)
            .ok_or_else(|| PathsError::UnknownScanKey { key: key.clone() })?;
        let roots = self
            .config
            .volume_root_data_dirs()
            .ok_or(PathsError::MissingRootConfig)?;
        find_full_path(roots, relative)
    }

    fn find_files_by_type(&self, key: &ScanKey, pattern: &str) -> Result<(PathBuf, Vec<PathBuf>)> {
        let sess_dir = self.session_dir(key)?;
        let files = find_files(&sess_dir, pattern)?;
        Ok((sess_dir, files))
    }

    /// First tiff file under the scan's session directory.
    ///
    /// Folder structure: root / subject / session / .tif (raw).
    pub fn volume_tif_file(&self, key: &ScanKey) -> Result<PathBuf> {
        let (sess_dir, mut tiffs) = self.find_files_by_type(key, TIFF_PATTERN)?;
        if tiffs.is_empty() {
            return Err(PathsError::NoTiffFileFound {
                session_dir: sess_dir,
            });
        }
        Ok(tiffs.swap_remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomConfig;
    use crate::session::InMemorySessionDirectories;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn config_with_roots(roots: Vec<PathBuf>) -> Config {
        Config {
            custom: CustomConfig {
                volume_root_data_dir: Some(roots),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn resolves_under_the_containing_root() {
        let root1 = tempdir().unwrap();
        let root2 = tempdir().unwrap();
        fs::create_dir(root2.path().join("sub1")).unwrap();

        let roots = vec![root1.path().to_path_buf(), root2.path().to_path_buf()];
        let resolved = find_full_path(&roots, "sub1").unwrap();

        assert_eq!(resolved, root2.path().join("sub1"));
    }

    #[test]
    fn first_containing_root_wins() {
        let root1 = tempdir().unwrap();
        let root2 = tempdir().unwrap();
        fs::create_dir(root1.path().join("sub1")).unwrap();
        fs::create_dir(root2.path().join("sub1")).unwrap();

        let roots = vec![root1.path().to_path_buf(), root2.path().to_path_buf()];
        let resolved = find_full_path(&roots, "sub1").unwrap();

        assert_eq!(resolved, root1.path().join("sub1"));
    }

    #[test]
    fn unresolvable_directory_is_path_not_found() {
        let root = tempdir().unwrap();
        let roots = vec![root.path().to_path_buf()];

        let err = find_full_path(&roots, "missing").unwrap_err();
        assert!(matches!(
            err,
            PathsError::PathNotFound { relative } if relative == Path::new("missing")
        ));
    }

    #[test]
    fn empty_root_list_fails_fast() {
        let err = find_full_path(&[], "sub1").unwrap_err();
        assert!(matches!(err, PathsError::MissingRootConfig));
    }

    #[test]
    fn find_files_matches_extension_recursively() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.tif"), b"").unwrap();
        fs::write(dir.path().join("c.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("b.tif"), b"").unwrap();

        let mut found = find_files(dir.path(), TIFF_PATTERN).unwrap();
        found.sort();

        assert_eq!(
            found,
            vec![
                dir.path().join("a.tif"),
                dir.path().join("nested").join("b.tif"),
            ]
        );
    }

    #[test]
    fn find_files_is_empty_when_nothing_matches() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("c.txt"), b"").unwrap();

        assert!(find_files(dir.path(), TIFF_PATTERN).unwrap().is_empty());
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        let dir = tempdir().unwrap();
        let err = find_files(dir.path(), "*.{tif").unwrap_err();
        assert!(matches!(err, PathsError::InvalidPattern(_)));
    }

    #[test]
    fn missing_tiff_names_the_searched_directory() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("sub1")).unwrap();

        let mut sessions = InMemorySessionDirectories::new();
        sessions.insert("subject1", 0, "sub1");
        let locator = VolumeFileLocator::new(
            config_with_roots(vec![root.path().to_path_buf()]),
            sessions,
        );

        let err = locator
            .volume_tif_file(&ScanKey::new("subject1", 0, 0))
            .unwrap_err();
        assert!(matches!(
            err,
            PathsError::NoTiffFileFound { session_dir } if session_dir == root.path().join("sub1")
        ));
    }

    #[test]
    fn unknown_scan_key_is_reported_before_any_resolution() {
        let locator = VolumeFileLocator::new(
            config_with_roots(vec![PathBuf::from("/nonexistent")]),
            InMemorySessionDirectories::new(),
        );

        let err = locator
            .volume_tif_file(&ScanKey::new("subject9", 3, 0))
            .unwrap_err();
        assert!(matches!(err, PathsError::UnknownScanKey { key } if key.subject == "subject9"));
    }

    #[test]
    fn unset_roots_fail_without_touching_the_filesystem() {
        let mut sessions = InMemorySessionDirectories::new();
        sessions.insert("subject1", 0, "sub1");
        let locator = VolumeFileLocator::new(Config::default(), sessions);

        let err = locator
            .volume_tif_file(&ScanKey::new("subject1", 0, 0))
            .unwrap_err();
        assert!(matches!(err, PathsError::MissingRootConfig));
    }
}
