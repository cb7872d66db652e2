//! Line-oriented console report.
//!
//! ```text
//! Processing files in the following directory(ies): ["./photos", "./backup"]
//! 3f2a9c01be:
//!     ./photos/a.jpg
//!     ./backup/a.jpg ... Deleting duplicate.
//! ```
//!
//! A group starts with the first characters of its digest followed by a
//! colon, then one tab-indented line per member in group order.

use std::io::{self, Write};
use std::path::PathBuf;

use yansi::Paint;

use super::{DeletionSummary, MemberAction, Reporter};
use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::scanner::FileEntry;

/// Number of hex digits shown per digest unless configured otherwise.
pub const DEFAULT_DIGEST_PREFIX: usize = 10;

/// Text reporter writing to any [`Write`] sink.
#[derive(Debug)]
pub struct TextReporter<W> {
    writer: W,
    digest_len: usize,
    color: bool,
}

impl<W: Write> TextReporter<W> {
    /// Create a reporter showing the default digest prefix, without color.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            digest_len: DEFAULT_DIGEST_PREFIX,
            color: false,
        }
    }

    /// Number of hex digits to show for each digest (clamped to 1..=64).
    #[must_use]
    pub fn with_digest_len(mut self, len: usize) -> Self {
        self.digest_len = len.clamp(1, 64);
        self
    }

    /// Color the group headers.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn header(&self, group: &DuplicateGroup) -> String {
        let hex = group.hash_hex();
        let prefix = &hex[..self.digest_len.min(hex.len())];
        if self.color {
            format!("{}:", prefix.yellow().bold())
        } else {
            format!("{prefix}:")
        }
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn begin(&mut self, roots: &[PathBuf]) -> io::Result<()> {
        let shown: Vec<String> = roots.iter().map(|p| p.display().to_string()).collect();
        writeln!(
            self.writer,
            "Processing files in the following directory(ies): {shown:?}"
        )
    }

    fn group(&mut self, group: &DuplicateGroup) -> io::Result<()> {
        let header = self.header(group);
        writeln!(self.writer, "{header}")
    }

    fn member(&mut self, entry: &FileEntry, action: MemberAction) -> io::Result<()> {
        let suffix = match action {
            MemberAction::Listed => "",
            MemberAction::Deleted => " ... Deleting duplicate.",
            MemberAction::Trashed => " ... Moving duplicate to trash.",
            MemberAction::SkippedSameFile => " ... Same file as the kept copy, skipped.",
        };
        writeln!(self.writer, "\t{}{suffix}", entry.path.display())
    }

    fn finish(&mut self, summary: &ScanSummary, deletion: &DeletionSummary) -> io::Result<()> {
        log::info!(
            "{} files scanned ({}), {} duplicate groups, {} reclaimable",
            summary.total_files,
            summary.total_size_display(),
            summary.duplicate_groups,
            summary.reclaimable_display()
        );
        if deletion.deleted_files > 0 {
            log::info!(
                "Removed {} duplicates, freed {}",
                deletion.deleted_files,
                bytesize::ByteSize::b(deletion.bytes_freed)
            );
        }
        self.writer.flush()
    }
}
