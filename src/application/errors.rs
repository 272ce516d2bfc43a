//! Application layer errors

use std::path::PathBuf;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command loading and execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid command definition '{name}': {reason}")]
    InvalidDefinition { name: String, reason: String },

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Command directory scanning errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed descriptor {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("Invalid descriptor {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
