//! Configuration file loading and data directory resolution
//!
//! The pipeline keeps all mutable on-disk state (research cache, recovery
//! checkpoint, report output) under a single data directory. Resolution
//! follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. `data_dir` key in the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing config file is never fatal: the pipeline starts with compiled
//! defaults and logs a diagnostic instead.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "CINTEL_DATA_DIR";

/// Optional config file schema (`~/.config/cintel/config.toml`)
///
/// Every field is optional; anything absent falls back to the compiled
/// default, and environment variables override file values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Root data directory for cache, checkpoint and reports
    pub data_dir: Option<PathBuf>,
    /// Research cache subdirectory (relative paths resolve under data_dir)
    pub cache_dir: Option<PathBuf>,
    /// Cache entry time-to-live in hours
    pub cache_ttl_hours: Option<u64>,
    /// Outbound request cap per minute
    pub requests_per_minute: Option<u32>,
    /// Outbound request cap per hour
    pub requests_per_hour: Option<u32>,
    /// Report output directory
    pub output_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Load the config file from an explicit path.
    ///
    /// Returns `Error::NotFound` if the file does not exist and
    /// `Error::Config` if it exists but does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the config file from the default platform location, if present.
    ///
    /// Missing files degrade to defaults (logged at debug level); malformed
    /// files are reported as a warning and also degrade to defaults, so a
    /// bad edit never prevents startup.
    pub fn load_default() -> Self {
        let Some(path) = default_config_path() else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded config file");
                config
            }
            Err(Error::NotFound(_)) => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed config file");
                Self::default()
            }
        }
    }
}

/// Default config file path for the platform (`<config dir>/cintel/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cintel").join("config.toml"))
}

/// Resolve the data directory following the documented priority order.
pub fn resolve_data_dir(cli_arg: Option<&Path>, config: &ConfigFile) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: Config file
    if let Some(ref path) = config.data_dir {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// OS-dependent default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("cintel"))
        .unwrap_or_else(|| PathBuf::from("./cintel_data"))
}

/// Create the data directory if it does not exist yet
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        tracing::info!(path = %path.display(), "Created data directory");
    }
    Ok(())
}
