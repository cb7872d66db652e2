//! JSON output for duplicate scan results.
//!
//! The whole document is written once, at the end of the run, so that a
//! failed deletion never leaves half a document on stdout.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "directories": ["./"],
//!   "groups": [
//!     {
//!       "digest": "3f2a9c01be...",
//!       "size": 1024,
//!       "files": ["./a.txt", "./b.txt"],
//!       "deleted": ["./b.txt"]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "total_size": 1048576,
//!     "hashed_files": 12,
//!     "bytes_hashed": 65536,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 1024,
//!     "scan_duration_ms": 12,
//!     "deleted_files": 1,
//!     "bytes_freed": 1024,
//!     "skipped_same_file": 0
//!   }
//! }
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

use super::{DeletionSummary, MemberAction, Reporter};
use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::scanner::FileEntry;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// SHA-256 digest as 64 hex characters
    pub digest: String,
    /// Size of each member in bytes
    pub size: u64,
    /// Members in group order; the first one is kept
    pub files: Vec<String>,
    /// Members removed during this run
    pub deleted: Vec<String>,
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Regular files found across all roots
    pub total_files: usize,
    /// Combined size of those files in bytes
    pub total_size: u64,
    /// Files whose content was hashed
    pub hashed_files: usize,
    /// Bytes read while hashing
    pub bytes_hashed: u64,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Files beyond the first in each group
    pub duplicate_files: usize,
    /// Bytes held by those extra files
    pub reclaimable_space: u64,
    /// Wall-clock time of walking and hashing, in milliseconds
    pub scan_duration_ms: u64,
    /// Files removed or trashed
    pub deleted_files: usize,
    /// Bytes freed by those removals
    pub bytes_freed: u64,
    /// Redundant entries left alone because they are the kept file
    pub skipped_same_file: usize,
}

impl JsonSummary {
    /// Combine scan and deletion totals.
    #[must_use]
    pub fn new(summary: &ScanSummary, deletion: &DeletionSummary) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            hashed_files: summary.hashed_files,
            bytes_hashed: summary.bytes_hashed,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
            deleted_files: deletion.deleted_files,
            bytes_freed: deletion.bytes_freed,
            skipped_same_file: deletion.skipped_same_file,
        }
    }
}

/// Complete JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Scanned roots, in the order given
    pub directories: Vec<String>,
    /// Duplicate groups in report order
    pub groups: Vec<JsonGroup>,
    /// Scan and deletion totals
    pub summary: JsonSummary,
}

/// Reporter that collects the run and writes one pretty-printed document.
#[derive(Debug)]
pub struct JsonReporter<W> {
    writer: W,
    directories: Vec<String>,
    groups: Vec<JsonGroup>,
}

impl<W: Write> JsonReporter<W> {
    /// Create a reporter writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            directories: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn display(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn begin(&mut self, roots: &[PathBuf]) -> io::Result<()> {
        self.directories = roots.iter().map(|p| display(p)).collect();
        Ok(())
    }

    fn group(&mut self, group: &DuplicateGroup) -> io::Result<()> {
        self.groups.push(JsonGroup {
            digest: group.hash_hex(),
            size: group.size,
            files: Vec::with_capacity(group.len()),
            deleted: Vec::new(),
        });
        Ok(())
    }

    fn member(&mut self, entry: &FileEntry, action: MemberAction) -> io::Result<()> {
        let Some(current) = self.groups.last_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "member reported outside of a group",
            ));
        };
        let path = display(&entry.path);
        if action.removed() {
            current.deleted.push(path.clone());
        }
        current.files.push(path);
        Ok(())
    }

    fn finish(&mut self, summary: &ScanSummary, deletion: &DeletionSummary) -> io::Result<()> {
        let output = JsonOutput {
            directories: std::mem::take(&mut self.directories),
            groups: std::mem::take(&mut self.groups),
            summary: JsonSummary::new(summary, deletion),
        };
        serde_json::to_writer_pretty(&mut self.writer, &output)?;
        writeln!(self.writer)?;
        self.writer.flush()
    }
}
