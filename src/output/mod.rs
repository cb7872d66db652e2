//! Reporting of duplicate groups, with optional deletion of redundant copies.
//!
//! # Overview
//!
//! [`emit_report`] walks the confirmed groups in order and hands every
//! member to a [`Reporter`]. When deletion is enabled, each member after
//! the first is removed before its line is reported, so the report never
//! claims a deletion that did not happen. The first deletion failure stops
//! the run.
//!
//! Two reporters are provided:
//! - [`text::TextReporter`]: the classic line-oriented console format
//! - [`json::JsonReporter`]: one JSON document for scripting

pub mod json;
pub mod text;

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::actions::{delete_entry, identity_path, verify_unchanged, DeleteConfig, DeleteError};
use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::scanner::FileEntry;

pub use json::JsonReporter;
pub use text::TextReporter;

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Line-oriented console report
    #[default]
    Text,
    /// JSON document for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// What happened to one member of a duplicate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberAction {
    /// Listed only; deletion is not enabled or this is the kept copy.
    Listed,
    /// Removed permanently.
    Deleted,
    /// Moved to the system trash.
    Trashed,
    /// Same file as the kept copy (reached through overlapping roots); left alone.
    SkippedSameFile,
}

impl MemberAction {
    /// Whether the file is gone after this action.
    #[must_use]
    pub fn removed(self) -> bool {
        matches!(self, Self::Deleted | Self::Trashed)
    }
}

/// Totals of the deletion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionSummary {
    /// Number of files removed or trashed
    pub deleted_files: usize,
    /// Bytes freed by those removals
    pub bytes_freed: u64,
    /// Redundant entries that resolved to an already kept file
    pub skipped_same_file: usize,
}

/// Sink for the duplicate report.
pub trait Reporter {
    /// Called once before any group, with the scanned roots.
    fn begin(&mut self, roots: &[PathBuf]) -> io::Result<()>;

    /// Called when a new duplicate group starts.
    fn group(&mut self, group: &DuplicateGroup) -> io::Result<()>;

    /// Called for every member of the current group, in group order.
    fn member(&mut self, entry: &FileEntry, action: MemberAction) -> io::Result<()>;

    /// Called once after the last group.
    fn finish(&mut self, summary: &ScanSummary, deletion: &DeletionSummary) -> io::Result<()>;
}

/// Errors raised while reporting.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// Writing the report failed.
    #[error("failed to write report")]
    Io(#[from] io::Error),

    /// Removing a duplicate failed; the run stops here.
    #[error(transparent)]
    Delete(#[from] DeleteError),
}

/// Report every group and, if `deletion` is set, remove all but the first member.
///
/// # Errors
///
/// Returns the first write or deletion failure. Files deleted before the
/// failure stay deleted and have already been reported.
pub fn emit_report(
    roots: &[PathBuf],
    groups: &[DuplicateGroup],
    summary: &ScanSummary,
    reporter: &mut dyn Reporter,
    deletion: Option<&DeleteConfig>,
) -> Result<DeletionSummary, ReportError> {
    let mut outcome = DeletionSummary::default();

    reporter.begin(roots)?;

    for group in groups {
        reporter.group(group)?;

        let Some(config) = deletion else {
            for entry in &group.files {
                reporter.member(entry, MemberAction::Listed)?;
            }
            continue;
        };

        let Some(keeper) = group.keeper() else {
            continue;
        };

        // Never empty a group whose kept copy is no longer what was hashed.
        if config.verify_size {
            verify_unchanged(keeper)?;
        }
        reporter.member(keeper, MemberAction::Listed)?;

        let mut handled: HashSet<PathBuf> = HashSet::new();
        handled.insert(identity_path(&keeper.path));

        for entry in group.redundant() {
            if !handled.insert(identity_path(&entry.path)) {
                log::debug!("Skipping repeated path: {}", entry.path.display());
                outcome.skipped_same_file += 1;
                reporter.member(entry, MemberAction::SkippedSameFile)?;
                continue;
            }

            let result = delete_entry(entry, config)?;
            outcome.deleted_files += 1;
            outcome.bytes_freed += result.size;

            let action = if result.permanent {
                MemberAction::Deleted
            } else {
                MemberAction::Trashed
            };
            reporter.member(entry, action)?;
        }
    }

    reporter.finish(summary, &outcome)?;

    Ok(outcome)
}
