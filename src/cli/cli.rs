use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;

/// Keeps a destination directory an exact copy of a source directory.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// Base directory for relative roots and the default mirror file
    #[clap(long, short, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Mirror file declaring the roots [default: <root>/mirror.yaml]
    #[clap(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Source tree, overrides the mirror file
    #[clap(long, short, global = true)]
    pub source: Option<PathBuf>,

    /// Destination tree, overrides the mirror file
    #[clap(long, short, global = true)]
    pub destination: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Report whether the destination matches the source
    Status {
        /// Exit with an error when the trees differ
        #[clap(long)]
        fail_on_changes: bool,
    },
    /// Replace the destination with a copy of the source
    Sync {
        /// Copy even when the trees already match
        #[clap(long, short)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sync_with_roots() {
        let cli = Cli::try_parse_from([
            "treemirror",
            "sync",
            "--force",
            "-s",
            "Assets/TPromise",
            "-d",
            "../upm",
        ])
        .expect("Valid arguments");

        assert_eq!(cli.command, Command::Sync { force: true });
        assert_eq!(cli.source, Some(PathBuf::from("Assets/TPromise")));
        assert_eq!(cli.destination, Some(PathBuf::from("../upm")));
        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn parses_status_with_global_flags_before_subcommand() {
        let cli = Cli::try_parse_from([
            "treemirror",
            "--log-level",
            "debug",
            "--config",
            "custom.yaml",
            "status",
            "--fail-on-changes",
        ])
        .expect("Valid arguments");

        assert_eq!(
            cli.command,
            Command::Status {
                fail_on_changes: true
            }
        );
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    }

    #[test]
    fn requires_a_subcommand() {
        assert!(Cli::try_parse_from(["treemirror"]).is_err());
    }
}
