//! Command-line interface definitions.
//!
//! Flags override the settings file and `DUPSCAN_*` environment variables
//! only when they are actually given; see [`crate::config`].
//!
//! # Example
//!
//! ```bash
//! # Report duplicates under the current directory
//! dupscan
//!
//! # Two roots, skipping empty files
//! dupscan --directoryPath ~/photos --directoryPath /mnt/backup --ignoreEmpty
//!
//! # Delete redundant copies after confirmation, JSON report
//! dupscan --directoryPath ~/Downloads --deleteDuplicates --output json
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::output::OutputFormat;

/// Find files with identical content and optionally delete the extra copies.
///
/// Files are grouped by size first; only sizes shared by two or more files
/// are hashed (SHA-256). Every group keeps its first file in traversal order.
#[derive(Debug, Parser)]
#[command(name = "dupscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (repeatable; default: ./)
    #[arg(long = "directoryPath", value_name = "PATH")]
    pub directory_paths: Vec<PathBuf>,

    /// Skip zero-byte files
    #[arg(long = "ignoreEmpty")]
    pub ignore_empty: bool,

    /// Delete all but the first file of each group (asks for confirmation)
    #[arg(long = "deleteDuplicates")]
    pub delete_duplicates: bool,

    /// Move deleted duplicates to the system trash instead of removing them
    #[arg(long)]
    pub trash: bool,

    /// Report format
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Show the full 64-digit digest in text output
    #[arg(long)]
    pub full_digest: bool,

    /// Number of hashing threads (default: 4)
    ///
    /// Use 1 for strictly sequential reads, e.g. on spinning disks.
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Settings file (TOML)
    ///
    /// Defaults to dupscan.toml in the platform config directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show progress bars on stderr
    #[arg(long)]
    pub progress: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}
