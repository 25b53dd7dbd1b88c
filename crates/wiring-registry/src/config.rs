//! Registry configuration from TOML.
//!
//! ```toml
//! initial_capacity = 256
//!
//! [log]
//! filter = "wiring_registry=debug,info"
//! thread_ids = true
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Settings for a [`WiringRegistry`](crate::WiringRegistry) and its logging.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Number of provider revisions the index is pre-sized for.
    pub initial_capacity: usize,
    /// Logging bootstrap settings.
    pub log: LogConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            log: LogConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::ConfigParse`] if it is not valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Logging settings used by [`logging::init_with`](crate::logging::init_with).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub filter: String,
    /// Include thread ids in log lines.
    pub thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            thread_ids: true,
        }
    }
}
