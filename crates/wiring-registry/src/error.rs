//! Error types for wiring-registry

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse registry configuration: {0}")]
    ConfigToml(#[from] toml::de::Error),

    #[error("Invalid registry configuration at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Failed to render registry snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
