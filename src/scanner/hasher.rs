//! SHA-256 file hasher with streaming support.
//!
//! # Overview
//!
//! [`Hasher`] computes the SHA-256 digest of a file's full content by
//! reading it through a fixed-size buffer, so files larger than available
//! memory are handled without memory-mapping.
//!
//! Hashing can be cancelled between chunks through any number of shared
//! flags (Ctrl+C, or the fail-fast flag raised when a sibling task fails).

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::HashError;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Read buffer size used while streaming file content (64 KiB).
pub const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming SHA-256 hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
    cancel_flags: Vec<Arc<AtomicBool>>,
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: HASH_BUFFER_SIZE,
            cancel_flags: Vec::new(),
        }
    }

    /// Use a custom read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Add a flag that cancels hashing when set.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flags.push(flag);
        self
    }

    /// Check whether any cancel flag has been raised.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flags.iter().any(|f| f.load(Ordering::SeqCst))
    }

    /// Compute the SHA-256 digest of the whole file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or fully read, or
    /// [`HashError::Cancelled`] if a cancel flag is raised mid-stream.
    pub fn full_hash(&self, path: &Path) -> Result<Hash, HashError> {
        if self.is_cancelled() {
            return Err(HashError::Cancelled(path.to_path_buf()));
        }

        let mut file = File::open(path).map_err(|e| HashError::from_io(path.to_path_buf(), e))?;
        self.hash_reader(path, &mut file)
    }

    /// Compute the SHA-256 digest of an arbitrary reader.
    ///
    /// `path` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::full_hash`].
    pub fn hash_reader<R: Read>(&self, path: &Path, reader: &mut R) -> Result<Hash, HashError> {
        let mut digest = Sha256::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            if self.is_cancelled() {
                log::trace!("Hashing cancelled: {}", path.display());
                return Err(HashError::Cancelled(path.to_path_buf()));
            }

            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path.to_path_buf(), e)),
            };
            digest.update(&buffer[..n]);
        }

        Ok(digest.finalize().into())
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a digest as 64 lowercase hex characters.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    use std::fmt::Write;

    hash.iter().fold(String::with_capacity(64), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

/// Parse 64 hex characters back into a digest.
#[cfg(test)]
pub(crate) fn hex_to_hash(hex: &str) -> Option<Hash> {
    if hex.len() != 64 || !hex.is_ascii() {
        return None;
    }

    let mut hash = [0u8; 32];
    for (i, byte) in hash.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(hash)
}
