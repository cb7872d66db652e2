//! Logging setup on top of the `log` facade and `env_logger`.
//!
//! Log records always go to stderr; stdout carries only the report.
//! The level comes from, in priority order:
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (errors only) or `-v` / `-vv` (debug / trace)
//! 3. Default: warn, so a plain run prints nothing but the report
//!
//! ```rust,no_run
//! use dupscan::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("visible with -v");
//! ```

use std::env;
use std::io::Write;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Initialize the global logger once, from CLI verbosity flags.
///
/// A second call is ignored with a debug message instead of panicking, so
/// the library entry point can be driven several times from tests.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();
    builder.target(Target::Stderr);

    let from_env = env::var("RUST_LOG").is_ok();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        if verbose >= 1 {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} [{}] {}",
                buf.timestamp_millis(),
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
        }
    });

    match builder.try_init() {
        Ok(()) if from_env => log::debug!("Logging configured from RUST_LOG"),
        Ok(()) => log::debug!(
            "Logging initialized at level {:?}",
            determine_level(verbose, quiet)
        ),
        Err(e) => log::debug!("Logger already initialized: {e}"),
    }
}

/// Map CLI flags to a level filter. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
