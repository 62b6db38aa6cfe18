use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use compio::fs;
use snafu::{ResultExt, Snafu, ensure};
use tracing::{debug, error, info, warn};

use crate::ext::{PathDisplayExt, resolve_best_effort};

/// Totals for one successful sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Whether a previous destination tree was deleted first.
    pub replaced_existing: bool,
    pub files_copied: usize,
    /// Includes the destination root itself.
    pub directories_created: usize,
    pub bytes_copied: u64,
}

/// A directory still waiting to be copied, with the chain of resolved
/// directories above it so that linked directories cannot recurse forever.
struct PendingDirectory {
    from: PathBuf,
    to: PathBuf,
    ancestors: Vec<PathBuf>,
}

/// Replaces a destination tree with a copy of a source tree.
///
/// The strategy is full-replace: the whole destination is deleted before the
/// copy begins. Nothing is rolled back if the copy fails part-way, so after
/// an error the destination holds whatever was copied up to that point.
pub struct TreeMirror;

impl TreeMirror {
    pub async fn sync(source: &Path, destination: &Path) -> Result<SyncReport, SyncError> {
        if !source.is_dir() {
            error!(
                "Source path not found: {}",
                source.best_effort_path_display()
            );
            return SourceMissingSnafu {
                path: source.to_path_buf(),
            }
            .fail();
        }
        Self::ensure_disjoint(source, destination)?;

        let mut report = SyncReport {
            replaced_existing: Self::clear_destination(destination)?,
            ..SyncReport::default()
        };

        info!(
            "Copying from {} to {}",
            source.best_effort_path_display(),
            destination.best_effort_path_display()
        );
        Self::copy_tree(source, destination, &mut report).await?;

        info!(
            "Sync complete: {} files, {} directories, {} bytes",
            report.files_copied, report.directories_created, report.bytes_copied
        );
        Ok(report)
    }

    /// Refuses roots that are the same directory or contain one another.
    fn ensure_disjoint(source: &Path, destination: &Path) -> Result<(), SyncError> {
        let source_resolved = resolve_best_effort(source);
        let destination_resolved = resolve_best_effort(destination);

        ensure!(
            !source_resolved.starts_with(&destination_resolved)
                && !destination_resolved.starts_with(&source_resolved),
            OverlappingRootsSnafu {
                source_root: source_resolved,
                destination_root: destination_resolved,
            }
        );
        Ok(())
    }

    /// Deletes whatever is at `destination`. Returns whether anything was there.
    fn clear_destination(destination: &Path) -> Result<bool, SyncError> {
        let metadata = match std::fs::symlink_metadata(destination) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    "Destination {} does not exist yet",
                    destination.best_effort_path_display()
                );
                return Ok(false);
            }
            Err(e) => {
                return Err(e).context(RemoveDestinationSnafu {
                    path: destination.to_path_buf(),
                });
            }
        };

        info!(
            "Cleaning existing destination: {}",
            destination.best_effort_path_display()
        );
        let removal = if metadata.is_dir() {
            std::fs::remove_dir_all(destination)
        } else {
            std::fs::remove_file(destination)
        };
        removal.context(RemoveDestinationSnafu {
            path: destination.to_path_buf(),
        })?;

        Ok(true)
    }

    async fn copy_tree(
        source: &Path,
        destination: &Path,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let mut pending = vec![PendingDirectory {
            from: source.to_path_buf(),
            to: destination.to_path_buf(),
            ancestors: Vec::new(),
        }];

        while let Some(directory) = pending.pop() {
            let resolved = directory
                .from
                .canonicalize()
                .context(InspectEntrySnafu {
                    path: directory.from.clone(),
                })?;
            ensure!(
                !directory.ancestors.contains(&resolved),
                LinkLoopSnafu {
                    path: directory.from.clone(),
                }
            );

            fs::create_dir_all(&directory.to)
                .await
                .context(CreateDirectorySnafu {
                    path: directory.to.clone(),
                })?;
            report.directories_created += 1;

            let (files, subdirectories) = Self::list_directory(&directory.from)?;

            for file in files {
                let target = directory.to.join(file.file_name().unwrap_or_default());
                report.bytes_copied += Self::copy_file(&file, &target).await?;
                report.files_copied += 1;
            }

            let mut ancestors = directory.ancestors;
            ancestors.push(resolved);
            // Reversed so the stack pops subdirectories in name order
            for subdirectory in subdirectories.into_iter().rev() {
                let to = directory.to.join(subdirectory.file_name().unwrap_or_default());
                pending.push(PendingDirectory {
                    from: subdirectory,
                    to,
                    ancestors: ancestors.clone(),
                });
            }
        }

        Ok(())
    }

    /// Splits the children of `directory` into files and subdirectories,
    /// each sorted by name. Links are followed.
    fn list_directory(directory: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), SyncError> {
        let read_dir = std::fs::read_dir(directory).context(ReadDirectorySnafu {
            path: directory.to_path_buf(),
        })?;

        let mut files = Vec::new();
        let mut subdirectories = Vec::new();
        for entry in read_dir {
            let path = entry
                .context(ReadDirectorySnafu {
                    path: directory.to_path_buf(),
                })?
                .path();
            let metadata =
                std::fs::metadata(&path).context(InspectEntrySnafu { path: path.clone() })?;

            if metadata.is_dir() {
                subdirectories.push(path);
            } else if metadata.is_file() {
                files.push(path);
            } else {
                warn!(
                    "Skipping {}: neither a regular file nor a directory",
                    path.best_effort_path_display()
                );
            }
        }

        files.sort();
        subdirectories.sort();
        Ok((files, subdirectories))
    }

    async fn copy_file(from: &Path, to: &Path) -> Result<u64, SyncError> {
        debug!("Copying {}", from.best_effort_path_display());
        let bytes = fs::read(from).await.context(ReadFileSnafu {
            path: from.to_path_buf(),
        })?;
        let len = bytes.len() as u64;

        fs::write(to, bytes).await.0.context(WriteFileSnafu {
            path: to.to_path_buf(),
        })?;
        Ok(len)
    }
}

#[derive(Debug, Snafu)]
pub enum SyncError {
    #[snafu(display("Source path not found: {}", path.best_effort_path_display()))]
    SourceMissing { path: PathBuf },
    #[snafu(display(
        "Source {} and destination {} overlap",
        source_root.best_effort_path_display(),
        destination_root.best_effort_path_display()
    ))]
    OverlappingRoots {
        source_root: PathBuf,
        destination_root: PathBuf,
    },
    #[snafu(display("Failed to remove destination {}", path.best_effort_path_display()))]
    RemoveDestinationError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to create directory {}", path.best_effort_path_display()))]
    CreateDirectoryError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to list directory {}", path.best_effort_path_display()))]
    ReadDirectoryError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to inspect {}", path.best_effort_path_display()))]
    InspectEntryError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read {}", path.best_effort_path_display()))]
    ReadFileError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write {}", path.best_effort_path_display()))]
    WriteFileError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Linked directory {} loops back onto itself", path.best_effort_path_display()))]
    LinkLoop { path: PathBuf },
}

impl SyncError {
    /// The path the failure concerns.
    pub fn path(&self) -> &Path {
        match self {
            SyncError::SourceMissing { path }
            | SyncError::RemoveDestinationError { path, .. }
            | SyncError::CreateDirectoryError { path, .. }
            | SyncError::ReadDirectoryError { path, .. }
            | SyncError::InspectEntryError { path, .. }
            | SyncError::ReadFileError { path, .. }
            | SyncError::WriteFileError { path, .. }
            | SyncError::LinkLoop { path } => path,
            SyncError::OverlappingRoots {
                destination_root, ..
            } => destination_root,
        }
    }

    /// Whether the destination may have been modified before the failure.
    pub fn destination_touched(&self) -> bool {
        !matches!(
            self,
            SyncError::SourceMissing { .. } | SyncError::OverlappingRoots { .. }
        )
    }
}
