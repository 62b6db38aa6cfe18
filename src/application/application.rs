use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::{RuntimeConfig, console};
use crate::cli::{Cli, Command};
use crate::config::MirrorFileError;
use crate::mirror::{SyncError, SyncReport, TreeMirror};
use crate::tree::{CompareError, Mismatch, TreeComparator, Verdict};

/// What a command ended up doing, for callers that want more than the printed lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    InSync,
    Changed(Mismatch),
    Synced(SyncReport),
}

pub struct Application;

impl Application {
    pub async fn run(cli: Cli) -> Result<Outcome, ApplicationError> {
        let config = RuntimeConfig::resolve(cli).await?;
        debug!("Resolved runtime config: {:?}", config);

        match config.command {
            Command::Status { fail_on_changes } => Self::status(&config, fail_on_changes).await,
            Command::Sync { force } => Self::sync(&config, force).await,
        }
    }

    async fn status(
        config: &RuntimeConfig,
        fail_on_changes: bool,
    ) -> Result<Outcome, ApplicationError> {
        let verdict = TreeComparator::compare(&config.source, &config.destination)
            .await
            .context(ComparisonSnafu)?;

        match verdict {
            Verdict::Identical => {
                println!("{}", console::in_sync_line(&config.source, &config.destination));
                Ok(Outcome::InSync)
            }
            Verdict::Differs(mismatch) => {
                println!("{}", console::changes_line(&mismatch));
                ensure!(!fail_on_changes, OutOfSyncSnafu { mismatch });
                Ok(Outcome::Changed(mismatch))
            }
        }
    }

    async fn sync(config: &RuntimeConfig, force: bool) -> Result<Outcome, ApplicationError> {
        if !force && TreeComparator::is_synced(&config.source, &config.destination).await {
            info!("Trees already match, nothing to copy");
            println!("{}", console::in_sync_line(&config.source, &config.destination));
            return Ok(Outcome::InSync);
        }

        println!("{}", console::copying_line(&config.source, &config.destination));
        let report = match TreeMirror::sync(&config.source, &config.destination).await {
            Ok(report) => report,
            Err(error) => {
                println!("{}", console::failed_line(&error));
                return Err(error).context(MirrorSnafu);
            }
        };
        println!("{}", console::complete_line(&report));

        Ok(Outcome::Synced(report))
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the mirror file"))]
    MirrorFileError { source: MirrorFileError },
    #[snafu(display("No {} root configured, pass --{} or set it in the mirror file", setting, setting))]
    MissingSetting { setting: String },
    #[snafu(display("Critical failure encountered while comparing trees"))]
    ComparisonError { source: CompareError },
    #[snafu(display("Critical failure encountered while mirroring"))]
    MirrorError { source: SyncError },
    #[snafu(display("Destination is out of sync: {}", mismatch))]
    OutOfSync { mismatch: Mismatch },
}
