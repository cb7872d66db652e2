//! dupscan - duplicate file finder
//!
//! Walks one or more directory trees, buckets regular files by size, hashes
//! (SHA-256) only the sizes shared by two or more files, and reports every
//! set of files with identical content. Optionally deletes all but the first
//! file of each set after an explicit `y` confirmation.
//!
//! ```no_run
//! use dupscan::duplicates::DuplicateFinder;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(&[PathBuf::from(".")]).unwrap();
//! for group in &groups {
//!     println!("{}: {:?}", group.hash_hex(), group.paths());
//! }
//! println!("{} reclaimable", summary.reclaimable_display());
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Context;

use crate::actions::{Confirmer, DeleteConfig, PromptConfirmer, DELETE_PROMPT};
use crate::cli::Cli;
use crate::config::Settings;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{emit_report, JsonReporter, OutputFormat, Reporter, TextReporter};
use crate::progress::Progress;

/// Run the command line: set up logging, load settings, scan.
///
/// The Ctrl+C hook is installed only once the deletion prompt (if any) has
/// been answered, so an interrupt at the prompt still kills the process.
///
/// # Errors
///
/// Any configuration, traversal, hashing, deletion or output failure.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let settings = Settings::load(&cli)?;
    let color = !cli.no_color && io::stdout().is_terminal();

    let mut confirmer = PromptConfirmer::stdio();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    run_scan_with_shutdown(
        &settings,
        &mut confirmer,
        &mut out,
        || Ok(Some(signal::install_handler()?.get_flag())),
        color,
    )
}

/// Run one scan with explicit I/O, the entry point used by tests.
///
/// When deletion is enabled the confirmation is asked first, before any
/// file is read, and a declined prompt ends the run with
/// [`ExitCode::Declined`] without touching anything.
///
/// # Errors
///
/// Any traversal, hashing, deletion or output failure.
pub fn run_scan(
    settings: &Settings,
    confirmer: &mut dyn Confirmer,
    out: &mut dyn Write,
    shutdown: Option<Arc<AtomicBool>>,
    color: bool,
) -> anyhow::Result<ExitCode> {
    run_scan_with_shutdown(settings, confirmer, out, || Ok(shutdown), color)
}

/// Like [`run_scan`], but the shutdown flag is obtained from `install_shutdown`
/// after the confirmation. It is not called at all when the prompt is declined.
///
/// # Errors
///
/// Any traversal, hashing, deletion or output failure, and whatever
/// `install_shutdown` returns.
pub fn run_scan_with_shutdown<F>(
    settings: &Settings,
    confirmer: &mut dyn Confirmer,
    out: &mut dyn Write,
    install_shutdown: F,
    color: bool,
) -> anyhow::Result<ExitCode>
where
    F: FnOnce() -> anyhow::Result<Option<Arc<AtomicBool>>>,
{
    if settings.delete_duplicates {
        let confirmed = confirmer
            .confirm(DELETE_PROMPT)
            .context("failed to read confirmation")?;
        if !confirmed {
            log::warn!("Deletion not confirmed, aborting without touching any file");
            return Ok(ExitCode::Declined);
        }
    }

    let shutdown = install_shutdown()?;

    let mut config = FinderConfig::default()
        .with_ignore_empty(settings.ignore_empty)
        .with_io_threads(settings.io_threads);
    if let Some(flag) = shutdown {
        config = config.with_shutdown_flag(flag);
    }
    if settings.progress {
        config = config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let finder = DuplicateFinder::new(config);
    let (groups, summary) = finder.find_duplicates(&settings.directory_paths)?;

    let deletion = settings.delete_duplicates.then(|| {
        if settings.trash {
            DeleteConfig::trash()
        } else {
            DeleteConfig::permanent()
        }
    });

    let mut reporter: Box<dyn Reporter + '_> = match settings.output {
        OutputFormat::Text => Box::new(
            TextReporter::new(&mut *out)
                .with_digest_len(settings.digest_prefix_len)
                .with_color(color),
        ),
        OutputFormat::Json => Box::new(JsonReporter::new(&mut *out)),
    };

    emit_report(
        &settings.directory_paths,
        &groups,
        &summary,
        reporter.as_mut(),
        deletion.as_ref(),
    )?;

    Ok(ExitCode::Success)
}
