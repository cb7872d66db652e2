//! Layered run settings.
//!
//! Sources, lowest priority first:
//!
//! 1. [`Settings::default`]
//! 2. TOML file: the `--config` path, or `dupscan.toml` in the platform
//!    config directory when it exists
//! 3. `DUPSCAN_*` environment variables (e.g. `DUPSCAN_IO_THREADS=2`)
//! 4. command-line flags that were actually given
//!
//! ```toml
//! directory_paths = ["/home/me/photos", "/mnt/backup/photos"]
//! ignore_empty = true
//! io_threads = 2
//! output = "json"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;
use crate::output::text::DEFAULT_DIGEST_PREFIX;
use crate::output::OutputFormat;

/// Prefix of the environment variables read as settings.
pub const ENV_PREFIX: &str = "DUPSCAN_";

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "dupscan.toml";

/// Errors raised while assembling settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested settings file does not exist.
    #[error("settings file not found: {0}")]
    NotFound(PathBuf),

    /// A source could not be parsed or had the wrong type.
    #[error("failed to load settings")]
    Load(#[from] figment::Error),

    /// A value is out of range.
    #[error("invalid setting `{key}`: {reason}")]
    Invalid {
        /// Setting name
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Roots to scan, in order
    pub directory_paths: Vec<PathBuf>,
    /// Skip zero-byte files
    pub ignore_empty: bool,
    /// Delete all but the first file of each group after confirmation
    pub delete_duplicates: bool,
    /// Move deleted files to the trash instead of removing them
    pub trash: bool,
    /// Hashing threads
    pub io_threads: usize,
    /// Hex digits of the digest shown in text output
    pub digest_prefix_len: usize,
    /// Report format
    pub output: OutputFormat,
    /// Draw progress bars on stderr
    pub progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directory_paths: vec![PathBuf::from("./")],
            ignore_empty: false,
            delete_duplicates: false,
            trash: false,
            io_threads: 4,
            digest_prefix_len: DEFAULT_DIGEST_PREFIX,
            output: OutputFormat::Text,
            progress: false,
        }
    }
}

/// The subset of settings set on the command line.
///
/// Unset fields are skipped when serialized so they never mask lower layers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_paths: Option<Vec<PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_empty: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_duplicates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest_prefix_len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<bool>,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        // Boolean flags can only switch something on.
        let flag = |set: bool| set.then_some(true);
        Self {
            directory_paths: (!cli.directory_paths.is_empty()).then(|| cli.directory_paths.clone()),
            ignore_empty: flag(cli.ignore_empty),
            delete_duplicates: flag(cli.delete_duplicates),
            trash: flag(cli.trash),
            io_threads: cli.io_threads,
            digest_prefix_len: cli.full_digest.then_some(64),
            output: cli.output,
            progress: flag(cli.progress),
        }
    }
}

impl Settings {
    /// Assemble settings for a command line.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] if `--config` names a missing file, and any
    /// parse or validation error from the layers.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.clone())),
            Some(path) => Some(path.clone()),
            None => default_config_path().filter(|p| p.is_file()),
        };

        if let Some(ref path) = file {
            log::debug!("Reading settings from {}", path.display());
        }

        Self::from_sources(file.as_deref(), CliOverrides::from(cli))
    }

    /// Assemble settings from an optional TOML file, the environment and overrides.
    ///
    /// # Errors
    ///
    /// Parse errors from any layer and validation errors.
    pub fn from_sources(file: Option<&Path>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file_exact(path));
        }

        let settings: Settings = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
            .extract()?;

        settings.validate()?;
        log::trace!("Effective settings: {settings:?}");
        Ok(settings)
    }

    /// Reject values no run can work with.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.directory_paths.is_empty() {
            return Err(ConfigError::Invalid {
                key: "directory_paths",
                reason: "at least one directory is required".to_string(),
            });
        }
        if self.io_threads == 0 {
            return Err(ConfigError::Invalid {
                key: "io_threads",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(1..=64).contains(&self.digest_prefix_len) {
            return Err(ConfigError::Invalid {
                key: "digest_prefix_len",
                reason: format!("must be between 1 and 64, got {}", self.digest_prefix_len),
            });
        }
        Ok(())
    }
}

/// `dupscan.toml` in the platform config directory, if one can be determined.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "dupscan", "dupscan").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
