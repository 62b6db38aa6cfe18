use std::path::{Path, PathBuf};

use compio::fs;
use derive_more::Display;
use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};

use crate::ext::PathDisplayExt;

use super::{RelativeEntry, SnapshotEntry, SnapshotError, TreeSnapshot};

/// Which side of a comparison a root belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Side {
    #[display("source")]
    Source,
    #[display("destination")]
    Destination,
}

/// The first difference found between two trees.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Mismatch {
    #[display("{side} root {} does not exist", root.best_effort_path_display())]
    MissingRoot { side: Side, root: PathBuf },
    #[display("source has {source} files, destination has {destination}")]
    EntryCount { source: usize, destination: usize },
    #[display("file '{source}' in source lines up with '{destination}' in destination")]
    PathDiffers {
        source: RelativeEntry,
        destination: RelativeEntry,
    },
    #[display("contents of '{entry}' differ")]
    Content { entry: RelativeEntry },
}

/// Outcome of a tree comparison. Only valid for the instant it was computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Identical,
    Differs(Mismatch),
}

impl Verdict {
    pub fn is_identical(&self) -> bool {
        matches!(self, Verdict::Identical)
    }
}

/// Decides whether two trees hold the same files with the same bytes.
///
/// Only files take part: empty directories are invisible, so two trees that
/// differ only by an empty subdirectory compare identical.
pub struct TreeComparator;

impl TreeComparator {
    /// Returns `true` when both roots exist and hold byte-identical file sets.
    ///
    /// A missing root is an ordinary "not synced" answer. I/O failures during
    /// the comparison are logged and also answered with `false`.
    pub async fn is_synced(source: &Path, destination: &Path) -> bool {
        match Self::compare(source, destination).await {
            Ok(verdict) => verdict.is_identical(),
            Err(e) => {
                warn!("Comparison could not complete, treating trees as out of sync: {e}");
                false
            }
        }
    }

    /// Compares the trees and reports the first difference found.
    pub async fn compare(source: &Path, destination: &Path) -> Result<Verdict, CompareError> {
        debug!(
            "Comparing {} against {}",
            source.best_effort_path_display(),
            destination.best_effort_path_display()
        );

        let Some(source_snapshot) = Self::snapshot(Side::Source, source)? else {
            return Ok(Verdict::Differs(Mismatch::MissingRoot {
                side: Side::Source,
                root: source.to_path_buf(),
            }));
        };
        let Some(destination_snapshot) = Self::snapshot(Side::Destination, destination)? else {
            return Ok(Verdict::Differs(Mismatch::MissingRoot {
                side: Side::Destination,
                root: destination.to_path_buf(),
            }));
        };

        if source_snapshot.len() != destination_snapshot.len() {
            return Ok(Verdict::Differs(Mismatch::EntryCount {
                source: source_snapshot.len(),
                destination: destination_snapshot.len(),
            }));
        }

        let pairs = source_snapshot
            .entries()
            .iter()
            .zip(destination_snapshot.entries());
        for (source_entry, destination_entry) in pairs {
            if source_entry.relative != destination_entry.relative {
                return Ok(Verdict::Differs(Mismatch::PathDiffers {
                    source: source_entry.relative.clone(),
                    destination: destination_entry.relative.clone(),
                }));
            }

            if !Self::same_content(source_entry, destination_entry).await? {
                return Ok(Verdict::Differs(Mismatch::Content {
                    entry: source_entry.relative.clone(),
                }));
            }
        }

        debug!("Trees are identical ({} files)", source_snapshot.len());
        Ok(Verdict::Identical)
    }

    fn snapshot(side: Side, root: &Path) -> Result<Option<TreeSnapshot>, CompareError> {
        TreeSnapshot::capture(root).context(SnapshotSnafu { side })
    }

    async fn same_content(
        source: &SnapshotEntry,
        destination: &SnapshotEntry,
    ) -> Result<bool, CompareError> {
        let (source_bytes, destination_bytes) = futures::try_join!(
            read_entry(&source.absolute),
            read_entry(&destination.absolute)
        )?;
        Ok(source_bytes == destination_bytes)
    }
}

async fn read_entry(path: &Path) -> Result<Vec<u8>, CompareError> {
    fs::read(path).await.context(ReadSnafu {
        path: path.to_path_buf(),
    })
}

#[derive(Debug, Snafu)]
pub enum CompareError {
    #[snafu(display("Failed to enumerate the {side} tree"))]
    SnapshotError { side: Side, source: SnapshotError },
    #[snafu(display("Failed to read {} for comparison", path.best_effort_path_display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
}
