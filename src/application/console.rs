//! Coloured status lines printed for whoever invoked the tool.

use std::path::Path;

use colored::{ColoredString, Colorize};
use supports_color::Stream;

use crate::ext::PathDisplayExt;
use crate::mirror::{SyncError, SyncReport};
use crate::tree::Mismatch;

const TAG: &str = "[treemirror]";

/// Turns colouring off when stdout cannot render it.
pub fn configure_colors() {
    if supports_color::on(Stream::Stdout).is_none() {
        colored::control::set_override(false);
    }
}

fn amber(text: String) -> ColoredString {
    text.as_str().truecolor(0xE7, 0xB7, 0x3D)
}

fn red(text: String) -> ColoredString {
    text.as_str().red()
}

fn green(text: String) -> ColoredString {
    text.as_str().truecolor(0x3D, 0xE7, 0x3D)
}

pub fn in_sync_line(source: &Path, destination: &Path) -> ColoredString {
    green(format!(
        "{TAG} {} is in sync with {}",
        destination.best_effort_path_display(),
        source.best_effort_path_display()
    ))
}

pub fn changes_line(mismatch: &Mismatch) -> ColoredString {
    amber(format!("{TAG} Changes detected: {mismatch}"))
}

pub fn copying_line(source: &Path, destination: &Path) -> ColoredString {
    amber(format!(
        "{TAG} Copying from:\n  {}\nto:\n  {}",
        source.best_effort_path_display(),
        destination.best_effort_path_display()
    ))
}

pub fn complete_line(report: &SyncReport) -> ColoredString {
    let replaced = if report.replaced_existing {
        ", previous destination replaced"
    } else {
        ""
    };
    green(format!(
        "{TAG} Sync complete: {} files in {} directories ({} bytes){replaced}",
        report.files_copied, report.directories_created, report.bytes_copied
    ))
}

pub fn failed_line(error: &SyncError) -> ColoredString {
    let state = if error.destination_touched() {
        "destination may be partially copied"
    } else {
        "destination untouched"
    };
    red(format!(
        "{TAG} Sync failed at {} ({state})",
        error.path().best_effort_path_display()
    ))
}
