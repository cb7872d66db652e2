//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file bucketing (Phase 1)
//! - SHA-256 content grouping of same-size files (Phase 2)
//! - Duplicate group management

pub mod finder;
pub mod groups;

pub use finder::{
    group_by_hash, DuplicateFinder, FinderConfig, FinderError, HashConfig, HashStats, ScanSummary,
};
pub use groups::{group_by_size, DuplicateGroup, GroupingStats, HashGroups, SizeGroups};
