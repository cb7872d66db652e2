//! Size buckets, digest buckets and confirmed duplicate groups.
//!
//! # Overview
//!
//! Size grouping is the first phase of duplicate detection. Files with
//! different sizes cannot be duplicates, so only buckets holding two or
//! more files are ever handed to the hashing phase.
//!
//! Both bucket maps have an explicit iteration order:
//! - [`SizeGroups`] iterates in ascending size; each bucket keeps
//!   traversal order.
//! - [`HashGroups`] iterates digests in the order they were first seen,
//!   and each group keeps insertion order.
//!
//! The first member of a group is therefore deterministic, which matters
//! because it is the copy that deletion keeps.
//!
//! # Example
//!
//! ```
//! use dupscan::scanner::FileEntry;
//! use dupscan::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/file1.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file2.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups.candidate_buckets().count(), 1);
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::scanner::{hash_to_hex, FileEntry, Hash};

/// Files bucketed by exact byte size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeGroups {
    buckets: BTreeMap<u64, Vec<FileEntry>>,
}

impl SizeGroups {
    /// Create an empty set of buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file to the bucket for its size.
    pub fn add(&mut self, file: FileEntry) {
        self.buckets.entry(file.size).or_default().push(file);
    }

    /// Number of distinct sizes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if no file has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of files across all buckets.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Files of one size, in traversal order.
    #[cfg(test)]
    fn get(&self, size: u64) -> Option<&[FileEntry]> {
        self.buckets.get(&size).map(Vec::as_slice)
    }

    /// All buckets in ascending size order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &[FileEntry])> {
        self.buckets.iter().map(|(size, files)| (*size, files.as_slice()))
    }

    /// Buckets with two or more files, in ascending size order.
    pub fn candidate_buckets(&self) -> impl Iterator<Item = (u64, &[FileEntry])> {
        self.iter().filter(|(_, files)| files.len() > 1)
    }
}

impl FromIterator<FileEntry> for SizeGroups {
    fn from_iter<I: IntoIterator<Item = FileEntry>>(iter: I) -> Self {
        let mut groups = Self::new();
        for file in iter {
            groups.add(file);
        }
        groups
    }
}

/// Statistics from size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in buckets of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton buckets)
    pub eliminated_unique: usize,
    /// Number of zero-byte files that were kept
    pub empty_files: usize,
    /// Number of size buckets with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }

    /// Compute statistics for a set of size buckets.
    #[must_use]
    pub fn from_groups(groups: &SizeGroups) -> Self {
        let mut stats = Self {
            unique_sizes: groups.len(),
            ..Default::default()
        };

        for (size, files) in groups.iter() {
            stats.total_files += files.len();
            stats.total_size += size * files.len() as u64;
            if size == 0 {
                stats.empty_files += files.len();
            }
            if files.len() > 1 {
                stats.potential_duplicates += files.len();
                stats.duplicate_groups += 1;
            } else {
                stats.eliminated_unique += files.len();
            }
        }

        stats
    }
}

/// Group files by size (Phase 1).
///
/// Every input file lands in exactly one bucket; singleton buckets are kept
/// so the full size map can be inspected, and are skipped later by
/// [`SizeGroups::candidate_buckets`].
#[must_use]
pub fn group_by_size(files: Vec<FileEntry>) -> (SizeGroups, GroupingStats) {
    let groups: SizeGroups = files.into_iter().collect();
    let stats = GroupingStats::from_groups(&groups);

    log::debug!(
        "Size grouping: {} files, {} sizes, {} candidates ({:.1}% eliminated)",
        stats.total_files,
        stats.unique_sizes,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (groups, stats)
}

/// Files bucketed by content digest, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct HashGroups {
    index: HashMap<Hash, usize>,
    groups: Vec<(Hash, Vec<FileEntry>)>,
}

impl HashGroups {
    /// Create an empty set of digest buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file to its digest bucket, opening a new bucket if needed.
    pub fn add(&mut self, hash: Hash, file: FileEntry) {
        match self.index.get(&hash) {
            Some(&i) => self.groups[i].1.push(file),
            None => {
                self.index.insert(hash, self.groups.len());
                self.groups.push((hash, vec![file]));
            }
        }
    }

    /// Number of distinct digests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if nothing has been hashed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Files sharing one digest.
    #[cfg(test)]
    fn get(&self, hash: &Hash) -> Option<&[FileEntry]> {
        self.index.get(hash).map(|&i| self.groups[i].1.as_slice())
    }

    /// All digest buckets in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&Hash, &[FileEntry])> {
        self.groups.iter().map(|(h, files)| (h, files.as_slice()))
    }

    /// Keep only digests with two or more files, as confirmed duplicate groups.
    #[must_use]
    pub fn into_duplicate_groups(self) -> Vec<DuplicateGroup> {
        self.groups
            .into_iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(hash, files)| {
                let size = files.first().map_or(0, |f| f.size);
                DuplicateGroup::new(hash, size, files)
            })
            .collect()
    }
}

/// Confirmed duplicate group of files.
///
/// `files[0]` is the representative that deletion keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// SHA-256 of the file content
    pub hash: Hash,
    /// File size in bytes (shared by all members)
    pub size: u64,
    /// Member files in group order
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(hash: Hash, size: u64, files: Vec<FileEntry>) -> Self {
        Self { hash, size, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The file that is kept when duplicates are deleted.
    #[must_use]
    pub fn keeper(&self) -> Option<&FileEntry> {
        self.files.first()
    }

    /// Every member except the keeper.
    #[must_use]
    pub fn redundant(&self) -> &[FileEntry] {
        self.files.get(1..).unwrap_or_default()
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Total wasted space (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<std::path::PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}
