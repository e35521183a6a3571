//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Validation
//!
//! Values are validated after parsing: `api_base` must be an http(s) URL
//! and `visibility` must be a known value.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::platform::Visibility;

/// Contents of `config.toml`.
///
/// Every field is optional; unset fields fall through to environment
/// variables and flags.
///
/// # Example
///
/// ```toml
/// api_base = "https://github.example.com/api/v3"
/// owner = "myorg"
/// repository = "myrepo"
/// environment = "production"
/// visibility = "private"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// REST API base URL (GitHub Enterprise)
    pub api_base: Option<String>,

    /// Organization or user owning the secrets
    pub owner: Option<String>,

    /// Repository name
    pub repository: Option<String>,

    /// Environment name
    pub environment: Option<String>,

    /// Visibility for organization secrets ("all" or "private")
    pub visibility: Option<String>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base) = &self.api_base {
            let parsed = reqwest::Url::parse(base).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid api_base '{}': {}", base, e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidValue(format!(
                    "api_base must be an http(s) URL, got '{}'",
                    base
                )));
            }
        }

        if let Some(v) = &self.visibility {
            if Visibility::parse(v).is_none() {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid visibility '{}', must be one of: all, private",
                    v
                )));
            }
        }

        Ok(())
    }

    /// Parsed visibility, if set.
    pub fn visibility(&self) -> Option<Visibility> {
        self.visibility.as_deref().and_then(Visibility::parse)
    }
}
