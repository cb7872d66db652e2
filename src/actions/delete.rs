//! Removal of redundant duplicate copies.
//!
//! # Overview
//!
//! This module provides:
//! - Permanent deletion (default)
//! - Move to system trash (opt-in, recoverable)
//! - Re-verification of each file against its scan-time size
//!
//! # Safety
//!
//! Every deletion error is fatal to the run. Before a group is touched its
//! kept copy is re-checked, so a group whose keeper has vanished is never
//! emptied. A redundant entry that names the kept file itself (reachable
//! from two overlapping roots) is skipped rather than deleted.
//!
//! # Example
//!
//! ```no_run
//! use dupscan::actions::delete::{delete_entry, DeleteConfig};
//! use dupscan::scanner::FileEntry;
//! use std::path::PathBuf;
//!
//! let entry = FileEntry::new(PathBuf::from("/path/to/duplicate.txt"), 10);
//! match delete_entry(&entry, &DeleteConfig::default()) {
//!     Ok(result) => println!("Deleted: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::scanner::FileEntry;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// File changed since it was scanned.
    #[error("file modified since scan: {path} (expected {expected} bytes, found {actual})")]
    Modified {
        /// Path of the changed file
        path: PathBuf,
        /// Size recorded during traversal
        expected: u64,
        /// Size found now
        actual: u64,
    },

    /// Path is no longer a regular file.
    #[error("not a regular file anymore: {0}")]
    NotRegular(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed {
        /// Path that could not be trashed
        path: PathBuf,
        /// Message reported by the platform
        message: String,
    },

    /// General I/O error.
    #[error("I/O error for {path}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::NotRegular(p)
            | Self::Modified { path: p, .. }
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// Result of a successful deletion operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
    /// Whether deletion was permanent (true) or to trash (false).
    pub permanent: bool,
}

/// Configuration for deletion operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteConfig {
    /// Remove files permanently instead of moving them to the trash.
    pub permanent: bool,
    /// Re-stat each file and refuse to delete it if its size changed.
    pub verify_size: bool,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            permanent: true,
            verify_size: true,
        }
    }
}

impl DeleteConfig {
    /// Create config for trash deletion.
    #[must_use]
    pub fn trash() -> Self {
        Self {
            permanent: false,
            ..Self::default()
        }
    }

    /// Create config for permanent deletion.
    #[must_use]
    pub fn permanent() -> Self {
        Self::default()
    }
}

/// Check that a scanned file is still a regular file of the same size.
///
/// # Errors
///
/// `NotFound`, `PermissionDenied` or `Io` if it cannot be stat'ed,
/// `NotRegular` if it was replaced by something else, `Modified` if its
/// size changed.
pub fn verify_unchanged(entry: &FileEntry) -> Result<(), DeleteError> {
    let metadata =
        fs::symlink_metadata(&entry.path).map_err(|e| DeleteError::from_io(&entry.path, e))?;

    if !metadata.is_file() {
        return Err(DeleteError::NotRegular(entry.path.clone()));
    }

    if metadata.len() != entry.size {
        log::warn!(
            "File modified since scan: {} (size changed from {} to {})",
            entry.path.display(),
            entry.size,
            metadata.len()
        );
        return Err(DeleteError::Modified {
            path: entry.path.clone(),
            expected: entry.size,
            actual: metadata.len(),
        });
    }

    Ok(())
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// `TrashFailed` if the platform trash refuses the file.
pub fn delete_to_trash(path: &Path) -> Result<(), DeleteError> {
    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Moved to trash: {}", path.display());
    Ok(())
}

/// Permanently delete a single file.
///
/// # Errors
///
/// `NotFound`, `PermissionDenied` or `Io` from the underlying removal.
pub fn permanent_delete(path: &Path) -> Result<(), DeleteError> {
    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        DeleteError::from_io(path, e)
    })?;

    log::info!("Permanently deleted: {}", path.display());
    Ok(())
}

/// Delete one scanned file according to `config`.
///
/// # Errors
///
/// Any verification or removal failure.
pub fn delete_entry(entry: &FileEntry, config: &DeleteConfig) -> Result<DeleteResult, DeleteError> {
    if config.verify_size {
        verify_unchanged(entry)?;
    }

    if config.permanent {
        permanent_delete(&entry.path)?;
    } else {
        delete_to_trash(&entry.path)?;
    }

    Ok(DeleteResult {
        path: entry.path.clone(),
        size: entry.size,
        permanent: config.permanent,
    })
}

/// Resolve a path for identity comparison, falling back to the raw path.
#[must_use]
pub fn identity_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
