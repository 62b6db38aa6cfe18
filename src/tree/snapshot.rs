use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::debug;
use walkdir::WalkDir;

use crate::ext::PathDisplayExt;

use super::RelativeEntry;

/// One file found while walking a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub relative: RelativeEntry,
    pub absolute: PathBuf,
}

/// Sorted listing of every file under one root, taken at the instant of the walk.
///
/// Directories do not appear: a subdirectory with no files in it leaves no
/// trace in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    entries: Vec<SnapshotEntry>,
}

impl TreeSnapshot {
    /// Walks `root` and returns its files ordered by relative entry.
    ///
    /// Returns `Ok(None)` when `root` is not an existing directory.
    pub fn capture(root: &Path) -> Result<Option<Self>, SnapshotError> {
        if !root.is_dir() {
            debug!(
                "Root {} is not an existing directory",
                root.best_effort_path_display()
            );
            return Ok(None);
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).follow_links(true) {
            let entry = entry.context(WalkSnafu {
                root: root.to_path_buf(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let absolute = entry.into_path();
            let relative = RelativeEntry::from_paths(root, &absolute).ok_or_else(|| {
                SnapshotError::OutsideRoot {
                    root: root.to_path_buf(),
                    path: absolute.clone(),
                }
            })?;
            entries.push(SnapshotEntry { relative, absolute });
        }

        entries.sort_by(|a, b| a.relative.cmp(&b.relative));
        debug!(
            "Captured {} files under {}",
            entries.len(),
            root.best_effort_path_display()
        );

        Ok(Some(Self { entries }))
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Snafu)]
pub enum SnapshotError {
    #[snafu(display("Failed to walk tree rooted at {}", root.best_effort_path_display()))]
    WalkError {
        root: PathBuf,
        source: walkdir::Error,
    },
    #[snafu(display(
        "Walk of {} yielded {} which lies outside of it",
        root.best_effort_path_display(),
        path.best_effort_path_display()
    ))]
    OutsideRoot { root: PathBuf, path: PathBuf },
}
