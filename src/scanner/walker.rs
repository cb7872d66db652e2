//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting size metadata for every regular file in it.
//!
//! # Ordering
//!
//! The walk is depth-first and single-threaded, with the entries of each
//! directory sorted by file name. Two walks over an unchanged tree yield
//! the same sequence, which keeps the "first file" of every duplicate group
//! stable between runs.
//!
//! # Filtering
//!
//! - Directories, symlinks (never followed), devices, sockets and FIFOs are
//!   skipped without a diagnostic.
//! - Zero-byte files are skipped when [`WalkerConfig::ignore_empty`] is set.
//!
//! # Example
//!
//! ```no_run
//! use dupscan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Result<Vec<_>, _> = walker.walk().collect();
//! println!("Found {} files", files.unwrap().len());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for regular-file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for early termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// The root may also be a single regular file, in which case the walk
    /// yields just that file.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag.
    ///
    /// When the flag is raised the walk yields [`ScanError::Interrupted`]
    /// and produces nothing further.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the directory tree, yielding regular-file entries.
    ///
    /// Errors are yielded in place; callers treat the first one as fatal.
    /// A missing or unreadable root shows up as an error on the first item.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();

        let mut stopped = false;

        walk_dir.into_iter().filter_map(move |entry_result| {
            if stopped {
                return None;
            }
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                stopped = true;
                return Some(Err(ScanError::Interrupted));
            }

            match entry_result {
                Ok(entry) => {
                    // Symlinks report their own type here because links are not followed.
                    if !entry.file_type().is_file() {
                        log::trace!("Skipping non-regular entry: {}", entry.path().display());
                        return None;
                    }

                    let metadata = match entry.metadata() {
                        Ok(m) => m,
                        Err(e) => return Some(Err(self.convert_error(e))),
                    };

                    let size = metadata.len();
                    if size == 0 && self.config.ignore_empty {
                        log::trace!("Skipping empty file: {}", entry.path().display());
                        return None;
                    }

                    Some(Ok(FileEntry::new(entry.into_path(), size)))
                }
                Err(e) => Some(Err(self.convert_error(e))),
            }
        })
    }

    /// Convert a walkdir error into a [`ScanError`], keeping the I/O kind.
    fn convert_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let message = error.to_string();

        let scan_error = match error.into_io_error() {
            Some(io) => ScanError::from_io(path, io),
            // Loop errors only occur when following links, which we never do.
            None => ScanError::Io {
                path,
                source: std::io::Error::other(message),
            },
        };
        log::debug!("Walker error: {}", scan_error);
        scan_error
    }
}
