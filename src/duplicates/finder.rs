//! Duplicate finder implementation with two-phase detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Phase 1 - Size grouping**: walk every root and bucket regular files by
//!    size (see [`crate::duplicates::groups`]).
//! 2. **Phase 2 - Full hash**: SHA-256 every file in a bucket of two or more
//!    and bucket the results by digest. Singleton buckets are never opened.
//!
//! Any traversal or read failure aborts the whole run. Hashing runs on a
//! bounded rayon pool; the first failure raises a shared flag so that the
//! remaining tasks stop at their next chunk instead of finishing their files.
//!
//! # Example
//!
//! ```no_run
//! use dupscan::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(2));
//! let (groups, summary) = finder.find_duplicates(&[PathBuf::from(".")]).unwrap();
//!
//! println!("Found {} duplicate groups", summary.duplicate_groups);
//! println!("Reclaimable space: {}", summary.reclaimable_display());
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::groups::{group_by_size, DuplicateGroup, GroupingStats, HashGroups, SizeGroups};
use crate::progress::ProgressCallback;
use crate::scanner::{FileEntry, Hash, HashError, Hasher, ScanError, Walker, WalkerConfig};

/// Files above this size are logged when hashing starts.
const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Configuration for the hashing phase.
#[derive(Clone)]
pub struct HashConfig {
    /// Number of worker threads used for hashing.
    /// Default is 4 to prevent disk thrashing; 1 hashes sequentially.
    pub io_threads: usize,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for HashConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashConfig")
            .field("io_threads", &self.io_threads)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            progress_callback: None,
        }
    }
}

impl HashConfig {
    /// Set the number of hashing threads (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Statistics from the hashing phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashStats {
    /// Size buckets with 2+ files whose members were hashed
    pub buckets_hashed: usize,
    /// Singleton size buckets skipped without opening any file
    pub buckets_skipped: usize,
    /// Number of files hashed
    pub hashed_files: usize,
    /// Total bytes streamed through the hasher
    pub bytes_hashed: u64,
    /// Number of distinct digests produced
    pub unique_digests: usize,
}

/// Group same-size files by content digest (Phase 2).
///
/// Only buckets with two or more members are hashed. Results are grouped in
/// deterministic order (ascending bucket size, then traversal order) no
/// matter how the pool schedules the work.
///
/// # Errors
///
/// Returns [`FinderError::Hash`] for the first file (in that deterministic
/// order) that failed to hash, or [`FinderError::Interrupted`] if hashing was
/// cancelled by a shutdown request.
pub fn group_by_hash(
    size_groups: &SizeGroups,
    hasher: &Hasher,
    config: &HashConfig,
) -> Result<(HashGroups, HashStats), FinderError> {
    let mut stats = HashStats::default();

    let mut jobs: Vec<&FileEntry> = Vec::new();
    for (_, files) in size_groups.iter() {
        if files.len() < 2 {
            stats.buckets_skipped += 1;
            continue;
        }
        stats.buckets_hashed += 1;
        jobs.extend(files);
    }

    if jobs.is_empty() {
        log::debug!("Phase 2: No candidate files to hash");
        return Ok((HashGroups::new(), stats));
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("hashing", jobs.len());
    }

    log::info!(
        "Phase 2: Hashing {} files in {} size buckets",
        jobs.len(),
        stats.buckets_hashed
    );

    // Raised by the first failing task; the others stop at their next chunk.
    let abort = Arc::new(AtomicBool::new(false));
    let task_hasher = hasher.clone().with_cancel_flag(Arc::clone(&abort));
    let completed = AtomicUsize::new(0);

    let hash_one = |file: &&FileEntry| -> Result<Hash, HashError> {
        if abort.load(Ordering::SeqCst) {
            return Err(HashError::Cancelled(file.path.clone()));
        }

        if file.size > LARGE_FILE_THRESHOLD {
            log::debug!(
                "Hashing large file ({} MB): {}",
                file.size / (1024 * 1024),
                file.path.display()
            );
        }

        match task_hasher.full_hash(&file.path) {
            Ok(hash) => {
                log::trace!("Hashed: {}", file.path.display());
                // Counts finished files, so a failed or cancelled file is never shown as done.
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(ref callback) = config.progress_callback {
                    callback.on_progress(done, file.path.to_string_lossy().as_ref());
                    callback.on_item_completed(file.size);
                }
                Ok(hash)
            }
            Err(e) => {
                if !e.is_cancelled() {
                    log::debug!("Aborting hashing after failure: {}", e);
                    abort.store(true, Ordering::SeqCst);
                }
                Err(e)
            }
        }
    };

    let results: Vec<Result<Hash, HashError>> = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.io_threads.max(1))
        .build()
    {
        Ok(pool) => pool.install(|| jobs.par_iter().map(hash_one).collect()),
        Err(e) => {
            log::warn!("Failed to create hashing thread pool, hashing sequentially: {}", e);
            jobs.iter().map(hash_one).collect()
        }
    };

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("hashing");
    }

    let mut hash_groups = HashGroups::new();
    let mut cancelled = false;

    for (file, result) in jobs.into_iter().zip(results) {
        match result {
            Ok(hash) => {
                stats.hashed_files += 1;
                stats.bytes_hashed += file.size;
                hash_groups.add(hash, file.clone());
            }
            Err(e) if e.is_cancelled() => cancelled = true,
            Err(e) => return Err(FinderError::Hash(e)),
        }
    }

    if cancelled {
        log::info!("Phase 2: Interrupted by shutdown signal");
        return Err(FinderError::Interrupted);
    }

    stats.unique_digests = hash_groups.len();

    log::info!(
        "Phase 2 complete: {} files hashed, {} distinct digests",
        stats.hashed_files,
        stats.unique_digests
    );

    Ok((hash_groups, stats))
}

// ============================================================================
// DuplicateFinder - Pipeline Orchestrator
// ============================================================================

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Hashing phase configuration.
    pub hash_config: HashConfig,
    /// Optional shutdown flag for Ctrl+C handling.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("hash_config", &self.hash_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .finish()
    }
}

impl FinderConfig {
    /// Skip zero-byte files during traversal.
    #[must_use]
    pub fn with_ignore_empty(mut self, ignore_empty: bool) -> Self {
        self.walker_config.ignore_empty = ignore_empty;
        self
    }

    /// Set the number of hashing threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.hash_config = self.hash_config.with_io_threads(threads);
        self
    }

    /// Set the shutdown flag for Ctrl+C handling.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.hash_config = self.hash_config.with_progress_callback(callback);
        self
    }

    fn progress_callback(&self) -> Option<&Arc<dyn ProgressCallback>> {
        self.hash_config.progress_callback.as_ref()
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Total number of files scanned
    pub total_files: usize,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Number of files eliminated by size grouping (unique sizes)
    pub eliminated_by_size: usize,
    /// Number of files whose content was hashed
    pub hashed_files: usize,
    /// Bytes read while hashing
    pub bytes_hashed: u64,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding kept copies)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Fill in the duplicate counters from the final groups.
    pub fn record_groups(&mut self, groups: &[DuplicateGroup]) {
        self.duplicate_groups = groups.len();
        self.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        self.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        bytesize::ByteSize::b(self.total_size).to_string()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// Traversal failed.
    #[error(transparent)]
    Scan(ScanError),

    /// A candidate file could not be hashed.
    #[error(transparent)]
    Hash(HashError),
}

impl From<ScanError> for FinderError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Interrupted => Self::Interrupted,
            other => Self::Scan(other),
        }
    }
}

/// Duplicate finder that orchestrates the two-phase detection pipeline.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new();
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_cancel_flag(Arc::clone(flag));
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    fn is_shutdown_requested(&self) -> bool {
        self.config
            .shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk every root in order and bucket the regular files by size.
    ///
    /// Overlapping roots are walked independently, so a file reachable from
    /// two roots appears twice.
    ///
    /// # Errors
    ///
    /// The first traversal error aborts the walk.
    pub fn bucket_by_size(
        &self,
        roots: &[PathBuf],
    ) -> Result<(SizeGroups, GroupingStats), FinderError> {
        let callback = self.config.progress_callback();
        if let Some(callback) = callback {
            callback.on_phase_start("walking", 0);
        }

        let mut files = Vec::new();
        for root in roots {
            if self.is_shutdown_requested() {
                return Err(FinderError::Interrupted);
            }

            log::info!("Walking {}", root.display());
            if let Some(callback) = callback {
                callback.on_message(&format!("Walking {}", root.display()));
            }

            let mut walker = Walker::new(root, self.config.walker_config);
            if let Some(ref flag) = self.config.shutdown_flag {
                walker = walker.with_shutdown_flag(Arc::clone(flag));
            }

            for entry in walker.walk() {
                let file = entry?;
                if let Some(callback) = callback {
                    callback.on_progress(files.len() + 1, file.path.to_string_lossy().as_ref());
                }
                files.push(file);
            }
        }

        if let Some(callback) = callback {
            callback.on_phase_end("walking");
        }

        Ok(group_by_size(files))
    }

    /// Hash the candidate buckets of a size grouping.
    ///
    /// # Errors
    ///
    /// See [`group_by_hash`].
    pub fn hash_buckets(
        &self,
        size_groups: &SizeGroups,
    ) -> Result<(HashGroups, HashStats), FinderError> {
        group_by_hash(size_groups, &self.hasher, &self.config.hash_config)
    }

    /// Run the full pipeline over the given roots.
    ///
    /// # Errors
    ///
    /// Returns the first traversal or hashing error, or
    /// [`FinderError::Interrupted`] on shutdown.
    pub fn find_duplicates(
        &self,
        roots: &[PathBuf],
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        log::info!("Starting duplicate scan of {} root(s)", roots.len());

        let (size_groups, size_stats) = self.bucket_by_size(roots)?;
        let (hash_groups, hash_stats) = self.hash_buckets(&size_groups)?;
        let groups = hash_groups.into_duplicate_groups();

        let mut summary = ScanSummary {
            total_files: size_stats.total_files,
            total_size: size_stats.total_size,
            eliminated_by_size: size_stats.eliminated_unique,
            hashed_files: hash_stats.hashed_files,
            bytes_hashed: hash_stats.bytes_hashed,
            ..Default::default()
        };
        summary.record_groups(&groups);
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} groups, {} duplicates, {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        );

        Ok((groups, summary))
    }
}
