//! Error types for the orderly CLI.

use std::path::PathBuf;

use orderly_core::CoreError;

use crate::config::ConfigError;

/// CLI errors. A rejected entity is *not* an error; it is a normal outcome.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read stdin: {0}")]
    Stdin(std::io::Error),

    #[error("Invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid currency: {0}")]
    Currency(String),

    #[error("Internal error: {0}")]
    Core(#[from] CoreError),
}
