//! Loader configuration.
//!
//! `LoaderConfig` controls how scene documents are fetched: the HTTP timeout
//! and user agent, and whether plain paths and `file://` locators may be read
//! from the local filesystem.
//!
//! Configuration is read from TOML. [`LoaderConfig::load`] checks, in order:
//!
//! 1. An explicit path passed by the caller
//! 2. The `SCENERY_CONFIG` environment variable
//! 3. Built-in defaults
//!
//! # Example
//!
//! ```
//! use scenery_core::config::LoaderConfig;
//!
//! let config = LoaderConfig::from_toml_str("timeout_secs = 5").unwrap();
//! assert_eq!(config.timeout_secs, 5);
//! assert!(config.allow_file_locators);
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "SCENERY_CONFIG";

/// Settings for fetching scene documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Allow plain paths and `file://` locators to be read from disk.
    #[serde(default = "default_true")]
    pub allow_file_locators: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("scenery/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            allow_file_locators: default_true(),
        }
    }
}

impl LoaderConfig {
    /// Parse a configuration from TOML text.
    ///
    /// Missing keys take their defaults; unknown keys and a zero timeout are
    /// rejected.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse loader config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, then `SCENERY_CONFIG`, then defaults.
    ///
    /// An explicitly named file that does not exist is an error; so is a
    /// file named by the environment variable.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match Self::resolve_path(path) {
            Some(path) => {
                log::debug!("Loading loader config from {}", path.display());
                let content = std::fs::read_to_string(&path)?;
                Self::from_toml_str(&content)
            }
            None => Ok(Self::default()),
        }
    }

    /// The configuration file that [`LoaderConfig::load`] would read, if any.
    pub fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = path {
            return Some(path.to_path_buf());
        }
        env::var_os(CONFIG_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    /// HTTP request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(Error::config("user_agent must not be empty"));
        }
        Ok(())
    }
}
