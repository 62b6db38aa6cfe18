use std::path::PathBuf;

use snafu::prelude::*;
use tracing::debug;

use crate::application::{ApplicationError, MirrorFileSnafu, MissingSettingSnafu};
use crate::cli::{Cli, Command};
use crate::config::{MirrorFile, default_mirror_file_path};

/// Roots and command for one invocation, after merging the mirror file
/// with command line overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub command: Command,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl RuntimeConfig {
    pub async fn resolve(cli: Cli) -> Result<Self, ApplicationError> {
        let mirror_file = match &cli.config {
            Some(path) => MirrorFile::read(&cli.root.join(path)).await,
            None => MirrorFile::read_if_present(&default_mirror_file_path(&cli.root)).await,
        }
        .context(MirrorFileSnafu)?;
        debug!("Loaded mirror file: {:?}", mirror_file);

        Self::merge(cli, mirror_file)
    }

    fn merge(cli: Cli, mirror_file: MirrorFile) -> Result<Self, ApplicationError> {
        let source = cli
            .source
            .map(|path| cli.root.join(path))
            .or(mirror_file.source)
            .context(MissingSettingSnafu { setting: "source" })?;
        let destination = cli
            .destination
            .map(|path| cli.root.join(path))
            .or(mirror_file.destination)
            .context(MissingSettingSnafu {
                setting: "destination",
            })?;

        Ok(Self {
            command: cli.command,
            source,
            destination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::data::LogLevel;
    use tempfile::TempDir;

    fn cli(root: PathBuf, source: Option<&str>, destination: Option<&str>) -> Cli {
        Cli {
            command: Command::Sync { force: false },
            log_level: LogLevel::Silent,
            root,
            config: None,
            source: source.map(PathBuf::from),
            destination: destination.map(PathBuf::from),
        }
    }

    #[compio::test]
    async fn command_line_roots_resolve_against_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let config = RuntimeConfig::resolve(cli(
            temp_dir.path().to_path_buf(),
            Some("Assets/TPromise"),
            Some("/abs/upm"),
        ))
        .await
        .expect("Resolvable config");

        assert_eq!(config.source, temp_dir.path().join("Assets/TPromise"));
        assert_eq!(config.destination, PathBuf::from("/abs/upm"));
    }

    #[compio::test]
    async fn command_line_overrides_mirror_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(
            default_mirror_file_path(temp_dir.path()),
            "source: from-file\ndestination: dest-from-file\n",
        )
        .expect("Failed to write mirror file");

        let config = RuntimeConfig::resolve(cli(
            temp_dir.path().to_path_buf(),
            Some("from-flag"),
            None,
        ))
        .await
        .expect("Resolvable config");

        assert_eq!(config.source, temp_dir.path().join("from-flag"));
        assert_eq!(config.destination, temp_dir.path().join("dest-from-file"));
    }

    #[compio::test]
    async fn missing_destination_is_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let result =
            RuntimeConfig::resolve(cli(temp_dir.path().to_path_buf(), Some("src"), None)).await;

        match result {
            Err(ApplicationError::MissingSetting { setting }) => {
                assert_eq!(setting, "destination")
            }
            other => panic!("Expected MissingSetting, got {other:?}"),
        }
    }

    #[compio::test]
    async fn explicit_config_must_exist() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut args = cli(temp_dir.path().to_path_buf(), Some("a"), Some("b"));
        args.config = Some(PathBuf::from("missing.yaml"));

        let result = RuntimeConfig::resolve(args).await;

        assert!(matches!(result, Err(ApplicationError::MirrorFileError { .. })));
    }
}
