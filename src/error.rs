//! Unified error types for wslnet

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for wslnet operations
#[derive(Error, Debug)]
pub enum Error {
    // Config errors
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation failed: {0}")]
    ConfigValidation(String),

    // Address errors
    #[error("Invalid IP address specified: '{0}'")]
    MalformedAddress(String),

    // Host network errors
    #[error("Cannot look up WSL network: {0}")]
    IdentityLookup(String),

    #[error("Existing WSL network cannot be deleted [{0}]")]
    Deletion(String),

    #[error("WSL network not created [{0}]")]
    Creation(String),

    #[error("Failed to serialize network document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid network lifecycle transition: {0}")]
    Lifecycle(String),

    // Guest errors
    #[error("Failed to add address inside the guest: {0}")]
    AliasAssignment(String),

    #[error("Guest command unavailable: {0}")]
    ExternalCommandUnavailable(String),
}

/// Result type alias for wslnet operations
pub type Result<T> = std::result::Result<T, Error>;
