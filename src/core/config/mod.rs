//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. Environment variables (handled by clap)
//! 4. CLI flags (handled by clap)
//!
//! # Locations
//!
//! Searched in order; the first existing file wins:
//! 1. `$GHSECRETS_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/ghsecrets/config.toml`
//! 3. `~/.ghsecrets/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use ghsecrets::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("API: {}", config.api_base());
//! if let Some(owner) = config.owner() {
//!     println!("Owner: {}", owner);
//! }
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::platform::github::DEFAULT_API_BASE;
use crate::platform::Visibility;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "GHSECRETS_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents (all unset if no file was found)
    pub file: FileConfig,
    /// Path of the file that was loaded
    path: Option<PathBuf>,
}

impl From<FileConfig> for Config {
    fn from(file: FileConfig) -> Self {
        Config { file, path: None }
    }
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated. A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
        Self::load_from(Self::candidates(explicit, xdg, dirs::home_dir()))
    }

    /// Load the first existing file from `candidates`.
    pub fn load_from(
        candidates: impl IntoIterator<Item = PathBuf>,
    ) -> Result<Self, ConfigError> {
        for path in candidates {
            if path.exists() {
                let file = Self::read_file(&path)?;
                file.validate()?;
                debug!(path = %path.display(), "loaded config");
                return Ok(Config {
                    file,
                    path: Some(path),
                });
            }
        }
        Ok(Config::default())
    }

    /// Search order for config files.
    fn candidates(
        explicit: Option<PathBuf>,
        xdg_config_home: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        paths.extend(explicit);
        paths.extend(xdg_config_home.map(|p| p.join("ghsecrets/config.toml")));
        paths.extend(home.map(|p| p.join(".ghsecrets/config.toml")));
        paths
    }

    /// Read and parse a config file.
    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Path of the loaded file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// REST API base URL.
    ///
    /// Defaults to `https://api.github.com`.
    pub fn api_base(&self) -> &str {
        self.file.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// Secret owner, if configured.
    pub fn owner(&self) -> Option<&str> {
        self.file.owner.as_deref()
    }

    /// Repository, if configured.
    pub fn repository(&self) -> Option<&str> {
        self.file.repository.as_deref()
    }

    /// Environment, if configured.
    pub fn environment(&self) -> Option<&str> {
        self.file.environment.as_deref()
    }

    /// Organization secret visibility, if configured.
    pub fn visibility(&self) -> Option<Visibility> {
        self.file.visibility()
    }
}
